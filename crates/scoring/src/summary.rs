use serde::{Deserialize, Serialize};

use crate::pipeline::ScoredRecord;
use crate::rules::Priority;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
}

impl PriorityCounts {
    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
            Priority::None => self.none += 1,
        }
    }
}

/// Aggregate view of one scored batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub by_priority: PriorityCounts,
    pub mean_probability: Option<f64>,
    pub max_probability: Option<f64>,
}

impl PipelineSummary {
    pub fn from_records(records: &[ScoredRecord]) -> Self {
        let mut by_priority = PriorityCounts::default();
        let mut sum = 0.0;
        let mut max: Option<f64> = None;

        for record in records {
            by_priority.record(record.priority);
            sum += record.probability;
            max = Some(max.map_or(record.probability, |m| m.max(record.probability)));
        }

        let mean_probability = if records.is_empty() {
            None
        } else {
            Some(sum / records.len() as f64)
        };

        Self {
            total: records.len(),
            by_priority,
            mean_probability,
            max_probability: max,
        }
    }
}
