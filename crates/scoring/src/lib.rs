pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod rules;
pub mod schema;
pub mod scorer;
pub mod summary;

pub use classifier::logistic::{load_model, LogisticModel};
pub use classifier::{ClassProbabilities, Classifier, FeatureMatrix};
pub use error::{FailureCause, MissingColumns, ModelError, PipelineFailure, ScoringFailure, Stage};
pub use pipeline::{run, EnrichedBatch, ScoredRecord, DERIVED_COLUMNS};
pub use record::{Batch, RequiredColumns, Value};
pub use rules::{Priority, Recommendation, RuleTable, ThresholdRule};
pub use scorer::ProbabilityScorer;
pub use summary::{PipelineSummary, PriorityCounts};
