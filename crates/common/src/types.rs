use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a running scoring service reports about itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub instance_id: Uuid,
    pub model_loaded: bool,
    /// Columns an uploaded file must contain.
    pub required_columns: Vec<String>,
}

impl ServiceInfo {
    pub fn new(name: &str, model_loaded: bool, required_columns: &[String]) -> Self {
        Self {
            name: name.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            instance_id: Uuid::new_v4(),
            model_loaded,
            required_columns: required_columns.to_vec(),
        }
    }
}
