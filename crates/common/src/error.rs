use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChurnError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("scoring error: {0}")]
    Scoring(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("bad request: {0}")]
    Request(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ChurnResult<T> = Result<T, ChurnError>;
