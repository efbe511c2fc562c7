// Repository trait for analytics report access
use crate::domain::report::{ReportRequest, ReportRow};
use async_trait::async_trait;

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Run one report and return its rows in upstream order
    /// (an empty report yields no rows).
    async fn run_report(&self, request: &ReportRequest) -> anyhow::Result<Vec<ReportRow>>;
}
