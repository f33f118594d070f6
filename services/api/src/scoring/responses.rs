use chrono::{DateTime, Utc};
use churn_scoring::{PipelineSummary, ThresholdRule, Value};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub columns: Vec<String>,
    /// Leading rows of the enriched batch, aligned to `columns`.
    pub rows: Vec<Vec<Value>>,
    pub count: usize,
    pub summary: PipelineSummary,
    pub generated_at: DateTime<Utc>,
    /// The full enriched batch as CSV, for `/download`.
    pub csv_data: String,
}

#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub data: Vec<ThresholdRule>,
    pub count: usize,
}
