use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use churn_common::error::ChurnError;
use churn_scoring::{FailureCause, PipelineFailure, ScoringFailure};

pub struct ApiError(pub ChurnError);

impl From<ChurnError> for ApiError {
    fn from(err: ChurnError) -> Self {
        Self(err)
    }
}

impl From<PipelineFailure> for ApiError {
    fn from(failure: PipelineFailure) -> Self {
        let err = match failure.cause {
            FailureCause::MissingColumns(missing) => ChurnError::Validation(format!(
                "missing required columns for the model: {}",
                missing.0.join(", ")
            )),
            FailureCause::Scoring(ScoringFailure::ModelUnavailable(_)) => ChurnError::Model(
                "the model is not available, contact the technical team".to_string(),
            ),
            FailureCause::Scoring(ScoringFailure::Inference(msg)) => {
                ChurnError::Scoring(format!("error predicting with the model: {msg}"))
            }
        };
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ChurnError::Request(msg) | ChurnError::Parse(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ChurnError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ChurnError::Model(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ChurnError::Scoring(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
