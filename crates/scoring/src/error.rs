use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Required feature columns absent from a batch, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", .0.join(", "))]
pub struct MissingColumns(pub Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringFailure {
    #[error("model is not available: {0}")]
    ModelUnavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Raised by a classifier when it cannot evaluate a feature matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("row {row} has {found} features, model expects {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: feature '{feature}' holds a {found} value, expected a finite number")]
    UnexpectedValue {
        row: usize,
        feature: String,
        found: &'static str,
    },

    #[error("column '{0}' is not present in the batch")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Validation,
    Scoring,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Scoring => "SCORING",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    #[error(transparent)]
    MissingColumns(#[from] MissingColumns),

    #[error(transparent)]
    Scoring(#[from] ScoringFailure),
}

/// A pipeline run that stopped at `stage`. The cause is the sub-stage error, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed: {cause}")]
pub struct PipelineFailure {
    pub stage: Stage,
    pub cause: FailureCause,
}

impl PipelineFailure {
    pub fn validation(missing: MissingColumns) -> Self {
        Self {
            stage: Stage::Validation,
            cause: FailureCause::MissingColumns(missing),
        }
    }

    pub fn scoring(failure: ScoringFailure) -> Self {
        Self {
            stage: Stage::Scoring,
            cause: FailureCause::Scoring(failure),
        }
    }

    pub fn missing_columns(&self) -> Option<&[String]> {
        match &self.cause {
            FailureCause::MissingColumns(MissingColumns(names)) => Some(names),
            FailureCause::Scoring(_) => None,
        }
    }
}
