pub mod formatters;
pub mod handlers;
pub mod parsing;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/download", post(handlers::download))
        .route("/rules", get(handlers::list_rules))
}
