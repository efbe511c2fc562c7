// Report record domain models
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of rows kept per report.
pub const REPORT_ROW_LIMIT: usize = 10;

/// Placeholder for a missing dimension value.
pub const UNKNOWN_DIMENSION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    pub city: String,
    pub users: u64,
    pub sessions: u64,
    pub bounce_rate: f64,
    pub pageviews: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSourceRecord {
    pub source: String,
    pub sessions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub platform: String,
    pub sessions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub location: String,
    pub pageviews: u64,
}

/// The aggregated payload served by `/api/analytics-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEnvelope {
    pub city_data: Vec<CityRecord>,
    pub traffic_sources: Vec<TrafficSourceRecord>,
    pub platforms: Vec<PlatformRecord>,
    pub location_data: Vec<LocationRecord>,
    #[serde(default)]
    pub last_updated: String,
}

impl DashboardEnvelope {
    /// Builds an envelope, enforcing the per-report ordering and row cap.
    pub fn new(
        city_data: Vec<CityRecord>,
        traffic_sources: Vec<TrafficSourceRecord>,
        platforms: Vec<PlatformRecord>,
        location_data: Vec<LocationRecord>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            city_data: top_by(city_data, |r| r.users),
            traffic_sources: top_by(traffic_sources, |r| r.sessions),
            platforms: top_by(platforms, |r| r.sessions),
            location_data: top_by(location_data, |r| r.pageviews),
            last_updated: iso_timestamp(generated_at),
        }
    }
}

/// Stable descending sort on `key`, capped at [`REPORT_ROW_LIMIT`].
///
/// Upstream already orders and limits each report, so for well-formed input
/// this leaves the rows untouched, ties included.
fn top_by<T>(mut rows: Vec<T>, key: impl Fn(&T) -> u64) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows.truncate(REPORT_ROW_LIMIT);
    rows
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn source(name: &str, sessions: u64) -> TrafficSourceRecord {
        TrafficSourceRecord {
            source: name.to_string(),
            sessions,
        }
    }

    #[test]
    fn test_envelope_sorts_descending_and_caps_rows() {
        let sources: Vec<_> = (0..15).map(|i| source(&format!("s{i}"), i)).collect();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let envelope = DashboardEnvelope::new(vec![], sources, vec![], vec![], at);

        assert_eq!(envelope.traffic_sources.len(), REPORT_ROW_LIMIT);
        assert_eq!(envelope.traffic_sources[0].sessions, 14);
        assert!(
            envelope
                .traffic_sources
                .windows(2)
                .all(|w| w[0].sessions >= w[1].sessions)
        );
    }

    #[test]
    fn test_envelope_keeps_upstream_order_on_ties() {
        let sources = vec![source("b", 5), source("a", 5), source("c", 7)];
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let envelope = DashboardEnvelope::new(vec![], sources, vec![], vec![], at);
        let names: Vec<_> = envelope.traffic_sources.iter().map(|s| s.source.as_str()).collect();

        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let city = CityRecord {
            city: "Oslo".to_string(),
            users: 3,
            sessions: 4,
            bounce_rate: 0.5,
            pageviews: 9,
        };
        let envelope = DashboardEnvelope::new(vec![city], vec![], vec![], vec![], at);

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["lastUpdated"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["cityData"][0]["bounceRate"], 0.5);
        assert!(json["trafficSources"].as_array().unwrap().is_empty());
        assert!(json["locationData"].is_array());
    }
}
