// HTTP request handlers
use crate::domain::fixtures::sample_envelope;
use crate::domain::records::{DashboardEnvelope, iso_timestamp};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::responses::HealthReport;
use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;

/// Liveness banner
pub async fn root() -> &'static str {
    "Analytics API is up and running."
}

/// Dashboard envelope built from the four GA4 reports
pub async fn analytics_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardEnvelope>, ApiError> {
    match state.report_service.fetch_dashboard().await {
        Ok(envelope) => Ok(Json(envelope)),
        Err(e) => {
            tracing::error!("Error fetching analytics data: {:#}", e);
            Err(ApiError::upstream(&e))
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "OK".to_string(),
        timestamp: iso_timestamp(Utc::now()),
        environment: state.credentials.into(),
    })
}

/// Fixed sample envelope, independent of GA4
pub async fn test_data() -> Json<DashboardEnvelope> {
    Json(sample_envelope(Utc::now()))
}
