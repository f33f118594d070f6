mod error;
mod scoring;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use churn_common::types::ServiceInfo;
use churn_config::{init_tracing, AppConfig};
use churn_scoring::{load_model, Classifier, ProbabilityScorer, RequiredColumns, RuleTable};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub scorer: ProbabilityScorer,
    pub rules: Arc<RuleTable>,
    pub required_columns: Arc<RequiredColumns>,
    pub preview_rows: usize,
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model_loaded": state.scorer.is_available(),
    }))
}

async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(
        "churn-api",
        state.scorer.is_available(),
        state.required_columns.names(),
    ))
}

fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .merge(scoring::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

/// Whether a model that records its training features expects exactly `required`.
fn features_aligned(classifier: &dyn Classifier, required: &RequiredColumns) -> bool {
    classifier
        .feature_names()
        .map_or(true, |features| features == required.names())
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level, config.log_format).expect("failed to initialize tracing");
    tracing::info!(service = "churn-api", "starting");

    let required_columns = RequiredColumns::new(config.required_columns.iter().cloned());
    if required_columns.is_empty() {
        tracing::warn!("REQUIRED_COLUMNS is empty, the model will receive no features");
    }

    let loaded = load_model(&config.model_path);
    if let Ok(classifier) = &loaded {
        if !features_aligned(classifier.as_ref(), &required_columns) {
            tracing::warn!(
                model_features = ?classifier.feature_names(),
                required = ?required_columns.names(),
                "model features differ from REQUIRED_COLUMNS"
            );
        }
    }
    let scorer = ProbabilityScorer::from_load_result(loaded);

    // An explicitly configured rule table must load; there is no silent fallback.
    let rules = match &config.rules_path {
        Some(path) => {
            let table = RuleTable::load(path).expect("failed to load rule table");
            tracing::info!(%path, rules = table.rules().len(), "loaded rule table");
            table
        }
        None => RuleTable::default(),
    };

    let state = AppState {
        scorer,
        rules: Arc::new(rules),
        required_columns: Arc::new(required_columns),
        preview_rows: config.preview_rows,
    };

    let app = build_router(state, config.max_upload_bytes);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
