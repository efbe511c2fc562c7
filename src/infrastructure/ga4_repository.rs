// GA4 Data API repository implementation
use crate::application::analytics_repository::AnalyticsRepository;
use crate::domain::report::{ReportRequest, ReportRow};
use crate::infrastructure::config::{ConfigError, GatewayConfig};
use crate::infrastructure::service_account::ServiceAccountAuth;
use crate::infrastructure::upstream::{UpstreamError, status_error};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct Ga4Repository {
    base_url: String,
    property_id: String,
    auth: ServiceAccountAuth,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReportRequest<'a> {
    date_ranges: Vec<DateRange<'a>>,
    dimensions: Vec<Named<'a>>,
    metrics: Vec<Named<'a>>,
    order_bys: Vec<OrderBy<'a>>,
    limit: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRange<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Debug, Serialize)]
struct Named<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderBy<'a> {
    metric: MetricOrderBy<'a>,
    desc: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricOrderBy<'a> {
    metric_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunReportResponse {
    #[serde(default)]
    rows: Option<Vec<Ga4Row>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ga4Row {
    #[serde(default)]
    dimension_values: Vec<Ga4Value>,
    #[serde(default)]
    metric_values: Vec<Ga4Value>,
}

#[derive(Debug, Deserialize)]
struct Ga4Value {
    #[serde(default)]
    value: Option<String>,
}

impl<'a> RunReportRequest<'a> {
    fn from_request(request: &'a ReportRequest) -> Self {
        Self {
            date_ranges: vec![DateRange {
                start_date: request.start_date.as_str(),
                end_date: request.end_date.as_str(),
            }],
            dimensions: request.dimensions.iter().map(|name| Named { name: name.as_str() }).collect(),
            metrics: request.metrics.iter().map(|name| Named { name: name.as_str() }).collect(),
            order_bys: request
                .order_metric()
                .map(|metric_name| OrderBy {
                    metric: MetricOrderBy { metric_name },
                    desc: true,
                })
                .into_iter()
                .collect(),
            limit: request.limit,
        }
    }
}

impl From<Ga4Row> for ReportRow {
    fn from(row: Ga4Row) -> Self {
        ReportRow::new(
            row.dimension_values.into_iter().map(|v| v.value).collect(),
            row.metric_values.into_iter().map(|v| v.value).collect(),
        )
    }
}

impl Ga4Repository {
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;
        let auth = ServiceAccountAuth::new(&config.credentials, config.token_uri.clone(), http.clone())?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            property_id: config.property_id.clone(),
            auth,
            http,
        })
    }

    fn run_report_url(&self) -> String {
        format!(
            "{}/v1beta/properties/{}:runReport",
            self.base_url,
            urlencoding::encode(&self.property_id)
        )
    }

    async fn execute(&self, request: &ReportRequest) -> Result<RunReportResponse, UpstreamError> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(self.run_report_url())
            .bearer_auth(token)
            .json(&RunReportRequest::from_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = status_error(response).await;
            if let UpstreamError::Status { status, message } = &err {
                tracing::warn!("GA4 runReport returned {}: {}", status, message);
            }
            return Err(err);
        }

        Ok(response.json::<RunReportResponse>().await?)
    }
}

#[async_trait]
impl AnalyticsRepository for Ga4Repository {
    async fn run_report(&self, request: &ReportRequest) -> Result<Vec<ReportRow>> {
        tracing::debug!(
            "Running GA4 report on {:?} ordered by {:?}",
            request.dimensions,
            request.order_metric()
        );
        let response = self.execute(request).await?;

        Ok(response
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(ReportRow::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::ReportKind;

    #[test]
    fn test_request_body_shape() {
        let request = ReportKind::City.request();
        let body = serde_json::to_value(RunReportRequest::from_request(&request)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "dateRanges": [{ "startDate": "30daysAgo", "endDate": "today" }],
                "dimensions": [{ "name": "city" }],
                "metrics": [
                    { "name": "totalUsers" },
                    { "name": "sessions" },
                    { "name": "bounceRate" },
                    { "name": "screenPageViews" }
                ],
                "orderBys": [{ "metric": { "metricName": "totalUsers" }, "desc": true }],
                "limit": 10
            })
        );
    }

    #[test]
    fn test_response_rows_keep_missing_cells() {
        let response: RunReportResponse = serde_json::from_value(serde_json::json!({
            "rows": [
                { "dimensionValues": [{ "value": "Lisbon" }], "metricValues": [{ "value": "12" }, {}] },
                { "metricValues": [{ "value": "3" }] }
            ],
            "rowCount": 2
        }))
        .unwrap();

        let rows: Vec<ReportRow> = response.rows.unwrap().into_iter().map(ReportRow::from).collect();

        assert_eq!(rows[0].dimension(0), "Lisbon");
        assert_eq!(rows[0].count(0), 12);
        assert_eq!(rows[0].count(1), 0);
        assert_eq!(rows[1].dimension(0), "Unknown");
        assert_eq!(rows[1].count(0), 3);
    }

    #[test]
    fn test_run_report_url_uses_configured_base() {
        let settings = config::Config::builder()
            .set_override("google_client_email", "svc@example.com")
            .unwrap()
            .set_override(
                "google_private_key",
                include_str!("../../tests/fixtures/service_account_key.pem"),
            )
            .unwrap()
            .set_override("ga_property_id", "123456")
            .unwrap()
            .set_override("ga_api_base_url", "http://127.0.0.1:9000/")
            .unwrap()
            .build()
            .unwrap();
        let repository = Ga4Repository::new(&GatewayConfig::from_settings(settings).unwrap()).unwrap();

        assert_eq!(
            repository.run_report_url(),
            "http://127.0.0.1:9000/v1beta/properties/123456:runReport"
        );
    }

    #[test]
    fn test_missing_rows_means_empty_report() {
        let response: RunReportResponse =
            serde_json::from_value(serde_json::json!({ "rowCount": 0 })).unwrap();
        assert!(response.rows.is_none());
    }
}
