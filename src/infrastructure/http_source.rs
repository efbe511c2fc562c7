// Gateway client used by the dashboard renderer
use crate::application::dashboard_controller::EnvelopeSource;
use crate::domain::records::{DashboardEnvelope, iso_timestamp};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct HttpEnvelopeSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpEnvelopeSource {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn analytics_url(&self) -> String {
        format!("{}/api/analytics-data", self.base_url)
    }
}

#[async_trait]
impl EnvelopeSource for HttpEnvelopeSource {
    async fn fetch(&self) -> Result<Option<DashboardEnvelope>> {
        let response = self
            .http
            .get(self.analytics_url())
            .send()
            .await
            .context("Failed to reach analytics gateway")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error! status: {}", response.status().as_u16());
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .context("Invalid JSON from analytics gateway")?;

        // Valid JSON without the four arrays is not an error, just unusable
        let Ok(mut envelope) = serde_json::from_value::<DashboardEnvelope>(body) else {
            return Ok(None);
        };
        if envelope.last_updated.is_empty() {
            envelope.last_updated = iso_timestamp(Utc::now());
        }
        Ok(Some(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_envelope;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use chrono::Utc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetches_envelope() {
        let envelope = sample_envelope(Utc::now());
        let body = envelope.clone();
        let url = serve(Router::new().route(
            "/api/analytics-data",
            get(move || async move { Json(body) }),
        ))
        .await;

        let fetched = HttpEnvelopeSource::new(format!("{url}/")).fetch().await.unwrap();

        assert_eq!(fetched, Some(envelope));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let url = serve(Router::new().route(
            "/api/analytics-data",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let err = HttpEnvelopeSource::new(url).fetch().await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_incomplete_envelope_is_unusable() {
        let url = serve(Router::new().route(
            "/api/analytics-data",
            get(|| async { Json(serde_json::json!({ "cityData": [] })) }),
        ))
        .await;

        let fetched = HttpEnvelopeSource::new(url).fetch().await.unwrap();

        assert_eq!(fetched, None);
    }

    #[tokio::test]
    async fn test_missing_timestamp_is_filled_in() {
        let url = serve(Router::new().route(
            "/api/analytics-data",
            get(|| async {
                Json(serde_json::json!({
                    "cityData": [],
                    "trafficSources": [],
                    "platforms": [],
                    "locationData": []
                }))
            }),
        ))
        .await;
        let before = Utc::now();

        let envelope = HttpEnvelopeSource::new(url).fetch().await.unwrap().unwrap();

        let filled = chrono::DateTime::parse_from_rfc3339(&envelope.last_updated)
            .unwrap()
            .with_timezone(&Utc);
        assert!(filled >= before - chrono::Duration::milliseconds(1));
        assert!(envelope.city_data.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_is_an_error() {
        let url = serve(Router::new().route("/api/analytics-data", get(|| async { "<html>" })))
            .await;

        let err = HttpEnvelopeSource::new(url).fetch().await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid JSON from analytics gateway");
    }
}
