use serde::Serialize;

use crate::error::PipelineFailure;
use crate::record::{Batch, RequiredColumns, Value};
use crate::rules::{Priority, RuleTable};
use crate::schema;
use crate::scorer::ProbabilityScorer;
use crate::summary::PipelineSummary;

/// Columns appended to every record, in output order.
pub const DERIVED_COLUMNS: [&str; 4] = [
    "probability",
    "probability_percent",
    "recommended_action",
    "priority",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    /// Source values, aligned to the non-derived columns of the enriched batch.
    pub values: Vec<Value>,
    pub probability: f64,
    pub probability_percent: f64,
    pub recommended_action: String,
    pub priority: Priority,
}

impl ScoredRecord {
    /// Source values followed by the derived values, as one output row.
    pub fn to_row(&self) -> Vec<Value> {
        let mut row = Vec::with_capacity(self.values.len() + DERIVED_COLUMNS.len());
        row.extend(self.values.iter().cloned());
        row.push(Value::Number(self.probability));
        row.push(Value::Number(self.probability_percent));
        row.push(Value::Text(self.recommended_action.clone()));
        row.push(Value::Text(self.priority.as_str().to_owned()));
        row
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedBatch {
    columns: Vec<String>,
    records: Vec<ScoredRecord>,
}

impl EnrichedBatch {
    /// Source columns followed by [`DERIVED_COLUMNS`].
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary::from_records(&self.records)
    }
}

/// `probability * 100`, rounded to two decimals with ties to even.
pub fn probability_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Validate, score and classify a batch.
///
/// Stops at the first failing stage. An unavailable model is reported at the
/// scoring stage before columns are checked, for any non-empty batch. Input
/// columns named like a derived column are replaced by the derived value.
pub fn run(
    batch: Batch,
    required: &RequiredColumns,
    scorer: &ProbabilityScorer,
    rules: &RuleTable,
) -> Result<EnrichedBatch, PipelineFailure> {
    let rows = batch.len();

    if !batch.is_empty() {
        if let Err(failure) = scorer.ensure_available() {
            tracing::warn!(rows, error = %failure, "model unavailable");
            return Err(PipelineFailure::scoring(failure));
        }
    }

    if let Err(missing) = schema::validate(&batch, required) {
        tracing::warn!(rows, missing = ?missing.0, "batch failed column validation");
        return Err(PipelineFailure::validation(missing));
    }

    let probabilities = match scorer.score(&batch, required) {
        Ok(probabilities) => probabilities,
        Err(failure) => {
            tracing::warn!(rows, error = %failure, "batch failed scoring");
            return Err(PipelineFailure::scoring(failure));
        }
    };

    let (source_columns, source_rows) = batch.into_parts();
    let keep: Vec<bool> = source_columns
        .iter()
        .map(|c| !DERIVED_COLUMNS.contains(&c.as_str()))
        .collect();

    let mut columns: Vec<String> = source_columns
        .into_iter()
        .zip(&keep)
        .filter(|(_, &k)| k)
        .map(|(c, _)| c)
        .collect();
    columns.extend(DERIVED_COLUMNS.iter().map(|c| c.to_string()));

    let records: Vec<ScoredRecord> = source_rows
        .into_iter()
        .zip(probabilities)
        .map(|(row, probability)| {
            let recommendation = rules.classify(probability);
            ScoredRecord {
                values: row
                    .into_iter()
                    .zip(&keep)
                    .filter(|(_, &k)| k)
                    .map(|(v, _)| v)
                    .collect(),
                probability,
                probability_percent: probability_percent(probability),
                recommended_action: recommendation.action.clone(),
                priority: recommendation.priority,
            }
        })
        .collect();

    tracing::info!(rows, features = required.len(), "batch scored");

    Ok(EnrichedBatch { columns, records })
}
