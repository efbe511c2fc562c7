// Report definitions and raw report rows
use super::records::UNKNOWN_DIMENSION;

/// Trailing window used by every dashboard report.
pub const REPORT_START_DATE: &str = "30daysAgo";
pub const REPORT_END_DATE: &str = "today";

/// The four fixed reports behind the dashboard, in envelope order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    City,
    TrafficSource,
    Platform,
    Location,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::City,
        ReportKind::TrafficSource,
        ReportKind::Platform,
        ReportKind::Location,
    ];

    pub fn dimension(self) -> &'static str {
        match self {
            ReportKind::City => "city",
            ReportKind::TrafficSource => "sessionDefaultChannelGroup",
            ReportKind::Platform => "deviceCategory",
            ReportKind::Location => "country",
        }
    }

    /// Metric names; the first one orders the report.
    pub fn metrics(self) -> &'static [&'static str] {
        match self {
            ReportKind::City => &["totalUsers", "sessions", "bounceRate", "screenPageViews"],
            ReportKind::TrafficSource | ReportKind::Platform => &["sessions"],
            ReportKind::Location => &["screenPageViews"],
        }
    }

    pub fn request(self) -> ReportRequest {
        ReportRequest {
            dimensions: vec![self.dimension().to_string()],
            metrics: self.metrics().iter().map(|m| m.to_string()).collect(),
            start_date: REPORT_START_DATE.to_string(),
            end_date: REPORT_END_DATE.to_string(),
            limit: super::records::REPORT_ROW_LIMIT,
        }
    }
}

/// A single report query, independent of the upstream wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub limit: usize,
}

impl ReportRequest {
    /// The metric rows are ordered by (descending).
    pub fn order_metric(&self) -> Option<&str> {
        self.metrics.first().map(String::as_str)
    }
}

/// One upstream row; any cell may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRow {
    pub dimension_values: Vec<Option<String>>,
    pub metric_values: Vec<Option<String>>,
}

impl ReportRow {
    pub fn new(dimension_values: Vec<Option<String>>, metric_values: Vec<Option<String>>) -> Self {
        Self {
            dimension_values,
            metric_values,
        }
    }

    /// Dimension value at `idx`, `"Unknown"` when absent or empty.
    pub fn dimension(&self, idx: usize) -> String {
        match self.dimension_values.get(idx) {
            Some(Some(value)) if !value.is_empty() => value.clone(),
            _ => UNKNOWN_DIMENSION.to_string(),
        }
    }

    pub fn count(&self, idx: usize) -> u64 {
        self.metric(idx).map(parse_count).unwrap_or(0)
    }

    pub fn rate(&self, idx: usize) -> f64 {
        self.metric(idx).map(parse_rate).unwrap_or(0.0)
    }

    fn metric(&self, idx: usize) -> Option<&str> {
        self.metric_values.get(idx).and_then(|v| v.as_deref())
    }
}

/// Lenient integer parse: leading digits only, fraction dropped, anything
/// unparsable or negative becomes 0.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u64::from(d));
    }

    if negative || !seen_digit { 0 } else { value }
}

/// Lenient float parse over the longest numeric prefix; non-finite or
/// unparsable input becomes 0.
pub fn parse_rate(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let candidate = &trimmed[..end];

    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
