use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use churn_common::error::{ChurnError, ChurnResult};
use serde::{Deserialize, Serialize};

/// Retention priority, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NONE" => Ok(Self::None),
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(format!("unknown priority: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: Priority,
}

/// Applies to every probability at or above `min_probability` not claimed by a higher rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub min_probability: f64,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

impl ThresholdRule {
    pub fn new(min_probability: f64, action: &str, priority: Priority) -> Self {
        Self {
            min_probability,
            recommendation: Recommendation {
                action: action.to_owned(),
                priority,
            },
        }
    }
}

/// Ordered threshold rules, highest bound first. The last rule has bound 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<ThresholdRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rules: vec![
                ThresholdRule::new(0.8, "Contact urgently: premium retention", Priority::High),
                ThresholdRule::new(0.5, "Offer moderate benefit / discount", Priority::Medium),
                ThresholdRule::new(
                    0.3,
                    "Maintain light contact (email / campaign)",
                    Priority::Low,
                ),
                ThresholdRule::new(0.0, "Do not intervene for now", Priority::None),
            ],
        }
    }
}

impl RuleTable {
    /// Build a table from rules in any order.
    ///
    /// Rejects empty tables, bounds outside [0, 1], duplicate bounds, and
    /// tables without a catch-all rule at 0.
    pub fn new(mut rules: Vec<ThresholdRule>) -> ChurnResult<Self> {
        if rules.is_empty() {
            return Err(ChurnError::Config("rule table is empty".to_string()));
        }

        if let Some(rule) = rules
            .iter()
            .find(|r| !(0.0..=1.0).contains(&r.min_probability))
        {
            return Err(ChurnError::Config(format!(
                "rule bound {} is outside [0, 1]",
                rule.min_probability
            )));
        }

        rules.sort_by(|a, b| b.min_probability.total_cmp(&a.min_probability));

        if let Some(pair) = rules
            .windows(2)
            .find(|pair| pair[0].min_probability == pair[1].min_probability)
        {
            return Err(ChurnError::Config(format!(
                "duplicate rule bound {}",
                pair[0].min_probability
            )));
        }

        if rules.last().map(|r| r.min_probability) != Some(0.0) {
            return Err(ChurnError::Config(
                "rule table needs a catch-all rule with bound 0".to_string(),
            ));
        }

        Ok(Self { rules })
    }

    pub fn from_json_str(raw: &str) -> ChurnResult<Self> {
        let rules: Vec<ThresholdRule> = serde_json::from_str(raw)
            .map_err(|e| ChurnError::Config(format!("invalid rule table: {e}")))?;
        Self::new(rules)
    }

    pub fn load(path: impl AsRef<Path>) -> ChurnResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ChurnError::Config(format!("cannot read rule table {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// First rule, walking down from the highest bound, whose bound is <= `probability`.
    pub fn classify(&self, probability: f64) -> &Recommendation {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} outside [0, 1]"
        );

        let rule = self
            .rules
            .iter()
            .find(|r| r.min_probability <= probability)
            .unwrap_or_else(|| self.catch_all());
        &rule.recommendation
    }

    fn catch_all(&self) -> &ThresholdRule {
        &self.rules[self.rules.len() - 1]
    }
}
