pub mod logistic;

use crate::error::ModelError;
use crate::record::{Batch, RequiredColumns, Value};

/// Class probabilities for one row of a binary classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub positive: f64,
}

impl ClassProbabilities {
    pub fn from_positive(positive: f64) -> Self {
        Self {
            negative: 1.0 - positive,
            positive,
        }
    }
}

/// A trained binary churn classifier.
///
/// Implementations must be immutable after construction: one instance is shared
/// by every concurrent pipeline run.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Feature names the model was trained on, when it records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Evaluate every row of `features` in one call.
    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<ClassProbabilities>, ModelError>;
}

/// Model input: one row per record, one column per required feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl FeatureMatrix {
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            feature_names,
            rows,
        }
    }

    /// Project each record of `batch` onto `required`, in declared order.
    pub fn project(batch: &Batch, required: &RequiredColumns) -> Result<Self, ModelError> {
        let indices = required
            .iter()
            .map(|name| {
                batch
                    .column_index(name)
                    .ok_or_else(|| ModelError::UnknownColumn(name.to_owned()))
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let rows = batch
            .rows()
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();

        Ok(Self::new(required.names().to_vec(), rows))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}
