// Chart descriptions derived from an envelope
use super::records::DashboardEnvelope;

/// Where a chart lives on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartSlot {
    UsersSessions,
    BounceRate,
    CityViews,
    TrafficSources,
    Platforms,
    LocationViews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Doughnut,
    Pie,
    HorizontalBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Count,
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: Option<String>,
    pub values: Vec<f64>,
}

impl Dataset {
    fn new(label: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            label: label.map(str::to_string),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub format: ValueFormat,
}

const SEGMENT_PALETTE: [&str; 6] = ["#00796b", "#ff9800", "#3f51b5", "#f44336", "#4caf50", "#9c27b0"];

impl ChartSpec {
    /// Segment colors for doughnut/pie charts, cycling when there are more
    /// labels than colors.
    pub fn segment_colors(&self) -> Vec<&'static str> {
        let available = match self.kind {
            ChartKind::Pie => 3,
            _ => SEGMENT_PALETTE.len(),
        };
        (0..self.labels.len())
            .map(|i| SEGMENT_PALETTE[i % available])
            .collect()
    }
}

/// The six dashboard charts, in drawing order.
pub fn build_chart_specs(envelope: &DashboardEnvelope) -> Vec<ChartSpec> {
    let cities: Vec<String> = envelope.city_data.iter().map(|r| r.city.clone()).collect();

    vec![
        ChartSpec {
            slot: ChartSlot::UsersSessions,
            kind: ChartKind::Bar,
            title: "Users & Sessions by City".to_string(),
            labels: cities.clone(),
            datasets: vec![
                Dataset::new(
                    Some("Total Users"),
                    envelope.city_data.iter().map(|r| r.users as f64).collect(),
                ),
                Dataset::new(
                    Some("Sessions"),
                    envelope.city_data.iter().map(|r| r.sessions as f64).collect(),
                ),
            ],
            format: ValueFormat::Count,
        },
        ChartSpec {
            slot: ChartSlot::BounceRate,
            kind: ChartKind::Line,
            title: "Bounce Rate by City".to_string(),
            labels: cities.clone(),
            datasets: vec![Dataset::new(
                Some("Bounce Rate"),
                envelope.city_data.iter().map(|r| r.bounce_rate).collect(),
            )],
            format: ValueFormat::Percent,
        },
        ChartSpec {
            slot: ChartSlot::CityViews,
            kind: ChartKind::Bar,
            title: "Views by City".to_string(),
            labels: cities,
            datasets: vec![Dataset::new(
                Some("Page Views"),
                envelope.city_data.iter().map(|r| r.pageviews as f64).collect(),
            )],
            format: ValueFormat::Count,
        },
        ChartSpec {
            slot: ChartSlot::TrafficSources,
            kind: ChartKind::Doughnut,
            title: "Traffic Sources".to_string(),
            labels: envelope.traffic_sources.iter().map(|r| r.source.clone()).collect(),
            datasets: vec![Dataset::new(
                None,
                envelope.traffic_sources.iter().map(|r| r.sessions as f64).collect(),
            )],
            format: ValueFormat::Count,
        },
        ChartSpec {
            slot: ChartSlot::Platforms,
            kind: ChartKind::Pie,
            title: "Traffic by Platform".to_string(),
            labels: envelope.platforms.iter().map(|r| r.platform.clone()).collect(),
            datasets: vec![Dataset::new(
                None,
                envelope.platforms.iter().map(|r| r.sessions as f64).collect(),
            )],
            format: ValueFormat::Count,
        },
        ChartSpec {
            slot: ChartSlot::LocationViews,
            kind: ChartKind::HorizontalBar,
            title: "Views by Location".to_string(),
            labels: envelope.location_data.iter().map(|r| r.location.clone()).collect(),
            datasets: vec![Dataset::new(
                Some("Page Views"),
                envelope.location_data.iter().map(|r| r.pageviews as f64).collect(),
            )],
            format: ValueFormat::Count,
        },
    ]
}
