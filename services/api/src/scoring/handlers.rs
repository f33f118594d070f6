use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::FormRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use chrono::Utc;
use churn_common::error::ChurnError;
use churn_scoring::pipeline;

use crate::error::ApiError;
use crate::scoring::formatters::format_enriched_csv;
use crate::scoring::parsing::parse_csv;
use crate::scoring::requests::DownloadForm;
use crate::scoring::responses::{RulesResponse, UploadResponse};
use crate::AppState;

pub const DOWNLOAD_FILENAME: &str = "churn_results.csv";

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ChurnError::Request(format!("invalid upload request: {e}")))?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ChurnError::Request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ChurnError::Request(format!("cannot read uploaded file: {e}")))?;
            upload = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ChurnError::Request("no file found in request".to_string()))?;
    if filename.is_empty() {
        return Err(ChurnError::Request("no file selected".to_string()).into());
    }

    let batch = parse_csv(&bytes)?;
    tracing::info!(%filename, rows = batch.len(), columns = batch.columns().len(), "csv received");

    let scorer = state.scorer.clone();
    let rules = state.rules.clone();
    let required = state.required_columns.clone();
    let enriched =
        tokio::task::spawn_blocking(move || pipeline::run(batch, &required, &scorer, &rules))
            .await
            .map_err(|e| ChurnError::Internal(format!("scoring task failed: {e}")))??;

    let csv_data = format_enriched_csv(&enriched)?;
    let rows = enriched
        .records()
        .iter()
        .take(state.preview_rows)
        .map(|r| r.to_row())
        .collect();

    Ok(Json(UploadResponse {
        columns: enriched.columns().to_vec(),
        rows,
        count: enriched.len(),
        summary: enriched.summary(),
        generated_at: Utc::now(),
        csv_data,
    }))
}

pub async fn download(
    form: Result<Form<DownloadForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) =
        form.map_err(|e| ChurnError::Request(format!("invalid download form: {e}")))?;
    let csv_data = form
        .csv_data
        .ok_or_else(|| ChurnError::Request("no data to download".to_string()))?;

    tracing::info!(bytes = csv_data.len(), "serving results download");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        csv_data,
    )
        .into_response())
}

pub async fn list_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    let data = state.rules.rules().to_vec();
    let count = data.len();
    Json(RulesResponse { data, count })
}
