// Fixed sample envelopes for demos and offline use
use super::records::{
    CityRecord, DashboardEnvelope, LocationRecord, PlatformRecord, TrafficSourceRecord,
};
use chrono::{DateTime, Utc};

/// Envelope served by `/api/test-data`.
pub fn sample_envelope(generated_at: DateTime<Utc>) -> DashboardEnvelope {
    build(
        &[
            ("Organic Search", 2456),
            ("Direct", 1789),
            ("Social Media", 987),
            ("Email", 654),
            ("Referral", 432),
        ],
        generated_at,
    )
}

/// Envelope the renderer falls back to when the gateway is unreachable.
pub fn demo_envelope(generated_at: DateTime<Utc>) -> DashboardEnvelope {
    build(
        &[
            ("Organic Search", 2456),
            ("Direct", 1789),
            ("Social", 987),
            ("Email", 654),
            ("Referral", 432),
        ],
        generated_at,
    )
}

fn build(sources: &[(&str, u64)], generated_at: DateTime<Utc>) -> DashboardEnvelope {
    let cities: [(&str, u64, u64, f64, u64); 5] = [
        ("New York", 1250, 1890, 0.45, 3450),
        ("London", 980, 1456, 0.52, 2890),
        ("Tokyo", 756, 1123, 0.38, 2234),
        ("Sydney", 543, 798, 0.48, 1567),
        ("Paris", 432, 645, 0.41, 1234),
    ];
    let platforms: [(&str, u64); 3] = [("Desktop", 3567), ("Mobile", 2789), ("Tablet", 456)];
    let locations: [(&str, u64); 5] = [
        ("United States", 4567),
        ("United Kingdom", 3234),
        ("Canada", 2456),
        ("Australia", 1789),
        ("Germany", 1234),
    ];

    DashboardEnvelope::new(
        cities
            .iter()
            .map(|&(city, users, sessions, bounce_rate, pageviews)| CityRecord {
                city: city.to_string(),
                users,
                sessions,
                bounce_rate,
                pageviews,
            })
            .collect(),
        sources
            .iter()
            .map(|&(source, sessions)| TrafficSourceRecord {
                source: source.to_string(),
                sessions,
            })
            .collect(),
        platforms
            .iter()
            .map(|&(platform, sessions)| PlatformRecord {
                platform: platform.to_string(),
                sessions,
            })
            .collect(),
        locations
            .iter()
            .map(|&(location, pageviews)| LocationRecord {
                location: location.to_string(),
                pageviews,
            })
            .collect(),
        generated_at,
    )
}
