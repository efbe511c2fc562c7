// Report service - Use case for assembling the dashboard envelope
use crate::application::analytics_repository::AnalyticsRepository;
use crate::domain::records::{
    CityRecord, DashboardEnvelope, LocationRecord, PlatformRecord, TrafficSourceRecord,
};
use crate::domain::report::{ReportKind, ReportRow};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn AnalyticsRepository>,
}

impl ReportService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repository }
    }

    /// Fetch all four reports and reshape them into one envelope.
    ///
    /// The reports are requested concurrently; the first failure fails the
    /// whole envelope.
    pub async fn fetch_dashboard(&self) -> anyhow::Result<DashboardEnvelope> {
        tracing::info!("Fetching analytics data");

        let (city, traffic, platform, location) = futures::try_join!(
            self.fetch_rows(ReportKind::City),
            self.fetch_rows(ReportKind::TrafficSource),
            self.fetch_rows(ReportKind::Platform),
            self.fetch_rows(ReportKind::Location),
        )?;

        let envelope = DashboardEnvelope::new(
            city.iter().map(city_record).collect(),
            traffic.iter().map(traffic_source_record).collect(),
            platform.iter().map(platform_record).collect(),
            location.iter().map(location_record).collect(),
            Utc::now(),
        );

        tracing::info!("Analytics data fetched successfully");
        Ok(envelope)
    }

    async fn fetch_rows(&self, kind: ReportKind) -> anyhow::Result<Vec<ReportRow>> {
        let request = kind.request();
        let rows = self.repository.run_report(&request).await.map_err(|e| {
            tracing::error!("Error running {:?} report: {:#}", kind, e);
            e
        })?;
        tracing::debug!("{:?} report returned {} rows", kind, rows.len());
        Ok(rows)
    }
}

fn city_record(row: &ReportRow) -> CityRecord {
    CityRecord {
        city: row.dimension(0),
        users: row.count(0),
        sessions: row.count(1),
        bounce_rate: row.rate(2),
        pageviews: row.count(3),
    }
}

fn traffic_source_record(row: &ReportRow) -> TrafficSourceRecord {
    TrafficSourceRecord {
        source: row.dimension(0),
        sessions: row.count(0),
    }
}

fn platform_record(row: &ReportRow) -> PlatformRecord {
    PlatformRecord {
        platform: row.dimension(0),
        sessions: row.count(0),
    }
}

fn location_record(row: &ReportRow) -> LocationRecord {
    LocationRecord {
        location: row.dimension(0),
        pageviews: row.count(0),
    }
}
