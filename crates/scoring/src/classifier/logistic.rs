use std::fs;
use std::path::Path;
use std::sync::Arc;

use churn_common::error::{ChurnError, ChurnResult};
use serde::{Deserialize, Serialize};

use super::{ClassProbabilities, Classifier, FeatureMatrix};
use crate::error::ModelError;
use crate::record::Value;

/// Binary logistic regression: `p = sigmoid(intercept + coefficients . x)`.
///
/// Serialized as JSON:
///
/// ```json
/// { "features": ["tenure", "tickets"], "intercept": -1.2, "coefficients": [0.4, 0.9] }
/// ```
///
/// `features` is informational; rows are matched to coefficients by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(default)]
    pub features: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> ChurnResult<Self> {
        let model = Self {
            features: Vec::new(),
            intercept,
            coefficients,
        };
        model.check()?;
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> ChurnResult<Self> {
        let model: Self = serde_json::from_str(raw)
            .map_err(|e| ChurnError::Model(format!("invalid model definition: {e}")))?;
        model.check()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> ChurnResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ChurnError::Model(format!("cannot read model file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    fn check(&self) -> ChurnResult<()> {
        if self.coefficients.is_empty() {
            return Err(ChurnError::Model("model has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ChurnError::Model(
                "model parameters must be finite numbers".to_string(),
            ));
        }
        if !self.features.is_empty() && self.features.len() != self.coefficients.len() {
            return Err(ChurnError::Model(format!(
                "model lists {} features but has {} coefficients",
                self.features.len(),
                self.coefficients.len()
            )));
        }
        Ok(())
    }

    fn positive_probability(
        &self,
        row_idx: usize,
        row: &[Value],
        feature_names: &[String],
    ) -> Result<f64, ModelError> {
        if row.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                row: row_idx,
                expected: self.coefficients.len(),
                found: row.len(),
            });
        }

        let mut z = self.intercept;
        for (col, (value, weight)) in row.iter().zip(&self.coefficients).enumerate() {
            let x = value
                .as_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| ModelError::UnexpectedValue {
                    row: row_idx,
                    feature: feature_names
                        .get(col)
                        .cloned()
                        .unwrap_or_else(|| format!("#{col}")),
                    found: if value.as_f64().is_some() {
                        "non-finite"
                    } else {
                        value.type_name()
                    },
                })?;
            z += weight * x;
        }

        Ok(sigmoid(z))
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.features.is_empty() {
            None
        } else {
            Some(&self.features)
        }
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<ClassProbabilities>, ModelError> {
        features
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                self.positive_probability(idx, row, features.feature_names())
                    .map(ClassProbabilities::from_positive)
            })
            .collect()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Load the process-wide classifier from a JSON model file.
pub fn load_model(path: impl AsRef<Path>) -> ChurnResult<Arc<dyn Classifier>> {
    let path = path.as_ref();
    let model = LogisticModel::load(path)?;
    tracing::info!(
        path = %path.display(),
        features = model.coefficients.len(),
        "loaded churn model"
    );
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn matrix(rows: Vec<Vec<Value>>) -> FeatureMatrix {
        FeatureMatrix::new(vec!["tenure".to_string(), "tickets".to_string()], rows)
    }

    #[test]
    fn zero_logit_is_even_odds() {
        let model = LogisticModel::new(0.0, vec![1.0, 1.0]).expect("valid model");
        let out = model
            .predict_proba(&matrix(vec![vec![0.0.into(), 0.0.into()]]))
            .expect("numeric row");
        assert!((out[0].positive - 0.5).abs() < 1e-12);
        assert!((out[0].negative - 0.5).abs() < 1e-12);
    }

    #[test]
    fn logit_combines_intercept_and_weights() {
        let model = LogisticModel::new(1.0, vec![2.0, -1.0]).expect("valid model");
        let out = model
            .predict_proba(&matrix(vec![
                vec![0.5.into(), 0.0.into()],
                vec![0.0.into(), 1.0.into()],
            ]))
            .expect("numeric rows");
        // z = 1 + 2*0.5 = 2
        assert!((out[0].positive - 0.880_797_077_977_882_3).abs() < 1e-12);
        // z = 1 - 1 = 0
        assert!((out[1].positive - 0.5).abs() < 1e-12);
    }

    #[test]
    fn extreme_logits_stay_in_range() {
        let model = LogisticModel::new(0.0, vec![1.0, 0.0]).expect("valid model");
        let out = model
            .predict_proba(&matrix(vec![
                vec![1e6.into(), 0.0.into()],
                vec![(-1e6).into(), 0.0.into()],
            ]))
            .expect("numeric rows");
        assert!(out[0].positive <= 1.0 && out[0].positive > 0.99);
        assert!(out[1].positive >= 0.0 && out[1].positive < 0.01);
    }

    #[test]
    fn string_feature_is_rejected() {
        let model = LogisticModel::new(0.0, vec![1.0, 1.0]).expect("valid model");
        let err = model
            .predict_proba(&matrix(vec![vec![1.0.into(), "many".into()]]))
            .expect_err("string feature");
        assert_eq!(
            err,
            ModelError::UnexpectedValue {
                row: 0,
                feature: "tickets".to_string(),
                found: "string",
            }
        );
    }

    #[test]
    fn empty_and_nan_features_are_rejected() {
        let model = LogisticModel::new(0.0, vec![1.0, 1.0]).expect("valid model");
        let empty = model.predict_proba(&matrix(vec![vec![Value::Empty, 1.0.into()]]));
        assert!(matches!(
            empty,
            Err(ModelError::UnexpectedValue { found: "empty", .. })
        ));

        let nan = model.predict_proba(&matrix(vec![vec![f64::NAN.into(), 1.0.into()]]));
        assert!(matches!(
            nan,
            Err(ModelError::UnexpectedValue { found: "non-finite", .. })
        ));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let model = LogisticModel::new(0.0, vec![1.0, 1.0, 1.0]).expect("valid model");
        let err = model
            .predict_proba(&matrix(vec![vec![1.0.into(), 2.0.into()]]))
            .expect_err("two features for three coefficients");
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                row: 0,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn invalid_definitions_are_rejected() {
        assert!(LogisticModel::new(0.0, Vec::new()).is_err());
        assert!(LogisticModel::new(f64::NAN, vec![1.0]).is_err());
        assert!(LogisticModel::from_json_str("{ \"intercept\": 0.0 }").is_err());
        assert!(LogisticModel::from_json_str(
            r#"{ "features": ["a"], "intercept": 0.0, "coefficients": [1.0, 2.0] }"#
        )
        .is_err());
    }

    #[test]
    fn parses_json_definition() {
        let model = LogisticModel::from_json_str(
            r#"{ "features": ["tenure", "tickets"], "intercept": -1.2, "coefficients": [0.4, 0.9] }"#,
        )
        .expect("valid json model");
        assert_eq!(model.features, vec!["tenure", "tickets"]);
        assert_eq!(model.coefficients, vec![0.4, 0.9]);
        assert_eq!(
            model.feature_names(),
            Some(&["tenure".to_string(), "tickets".to_string()][..])
        );
        assert!(LogisticModel::new(0.0, vec![1.0])
            .expect("valid model")
            .feature_names()
            .is_none());
    }

    #[test]
    fn load_model_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "intercept": 0.5, "coefficients": [1.5] }}"#).expect("write model");

        let classifier = load_model(file.path()).expect("model loads");
        assert_eq!(classifier.name(), "logistic_regression");
    }

    #[test]
    fn load_model_reports_missing_file() {
        let err = match load_model("/nonexistent/churn_model.json") {
            Ok(_) => panic!("missing file must fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ChurnError::Model(ref msg) if msg.contains("cannot read model file")));
    }
}
