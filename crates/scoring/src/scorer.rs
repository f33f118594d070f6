use std::fmt;
use std::sync::Arc;

use churn_common::error::ChurnResult;

use crate::classifier::{Classifier, FeatureMatrix};
use crate::error::ScoringFailure;
use crate::record::{Batch, RequiredColumns};

#[derive(Clone)]
enum ScorerState {
    Ready(Arc<dyn Classifier>),
    Disabled { reason: String },
}

/// Extracts per-record churn probabilities from a shared classifier.
///
/// A scorer built without a model stays usable: every non-empty batch fails
/// with [`ScoringFailure::ModelUnavailable`].
#[derive(Clone)]
pub struct ProbabilityScorer {
    state: ScorerState,
}

impl ProbabilityScorer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            state: ScorerState::Ready(classifier),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            state: ScorerState::Disabled {
                reason: reason.into(),
            },
        }
    }

    pub fn from_load_result(result: ChurnResult<Arc<dyn Classifier>>) -> Self {
        match result {
            Ok(classifier) => Self::new(classifier),
            Err(e) => {
                tracing::error!(error = %e, "churn model unavailable, scoring disabled");
                Self::disabled(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ScorerState::Ready(_))
    }

    pub fn ensure_available(&self) -> Result<(), ScoringFailure> {
        match &self.state {
            ScorerState::Ready(_) => Ok(()),
            ScorerState::Disabled { reason } => {
                Err(ScoringFailure::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Probability of the positive class for each record, in batch order.
    ///
    /// The classifier is called once for the whole batch. Any fault fails the
    /// batch as a whole.
    pub fn score(
        &self,
        batch: &Batch,
        required: &RequiredColumns,
    ) -> Result<Vec<f64>, ScoringFailure> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let classifier = match &self.state {
            ScorerState::Ready(classifier) => classifier,
            ScorerState::Disabled { reason } => {
                return Err(ScoringFailure::ModelUnavailable(reason.clone()))
            }
        };

        let features = FeatureMatrix::project(batch, required)
            .map_err(|e| ScoringFailure::Inference(e.to_string()))?;

        let output = classifier
            .predict_proba(&features)
            .map_err(|e| ScoringFailure::Inference(e.to_string()))?;

        if output.len() != batch.len() {
            return Err(ScoringFailure::Inference(format!(
                "classifier returned {} rows for {} records",
                output.len(),
                batch.len()
            )));
        }

        output
            .iter()
            .enumerate()
            .map(|(idx, probs)| {
                let p = probs.positive;
                if p.is_finite() && (0.0..=1.0).contains(&p) {
                    Ok(p)
                } else {
                    Err(ScoringFailure::Inference(format!(
                        "classifier returned probability {p} for row {idx}"
                    )))
                }
            })
            .collect()
    }
}

impl fmt::Debug for ProbabilityScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            ScorerState::Ready(classifier) => f
                .debug_struct("ProbabilityScorer")
                .field("classifier", &classifier.name())
                .finish(),
            ScorerState::Disabled { reason } => f
                .debug_struct("ProbabilityScorer")
                .field("disabled", reason)
                .finish(),
        }
    }
}
