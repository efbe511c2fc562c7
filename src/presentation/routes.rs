// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{analytics_data, health_check, root, test_data};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/analytics-data", get(analytics_data))
        .route("/api/health", get(health_check))
        .route("/api/test-data", get(test_data))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
