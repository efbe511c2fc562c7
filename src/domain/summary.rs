// Dashboard summary figures
use super::records::CityRecord;

/// Shown when there is no city to report.
pub const NO_CITY: &str = "–";

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_users: u64,
    pub total_sessions: u64,
    /// Mean bounce rate across cities; `None` without city rows.
    pub avg_bounce_rate: Option<f64>,
    pub most_active_city: String,
}

impl Summary {
    pub fn from_cities(cities: &[CityRecord]) -> Self {
        let total_users = cities.iter().map(|c| c.users).fold(0u64, u64::saturating_add);
        let total_sessions = cities.iter().map(|c| c.sessions).fold(0u64, u64::saturating_add);
        let avg_bounce_rate = (!cities.is_empty())
            .then(|| cities.iter().map(|c| c.bounce_rate).sum::<f64>() / cities.len() as f64);

        // First city wins on equal pageviews
        let most_active_city = cities
            .iter()
            .fold(None::<&CityRecord>, |best, c| match best {
                Some(b) if b.pageviews >= c.pageviews => Some(b),
                _ => Some(c),
            })
            .map(|c| c.city.clone())
            .unwrap_or_else(|| NO_CITY.to_string());

        Self {
            total_users,
            total_sessions,
            avg_bounce_rate,
            most_active_city,
        }
    }

    pub fn total_users_display(&self) -> String {
        group_thousands(self.total_users)
    }

    pub fn total_sessions_display(&self) -> String {
        group_thousands(self.total_sessions)
    }

    pub fn avg_bounce_display(&self) -> String {
        match self.avg_bounce_rate {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => NO_CITY.to_string(),
        }
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
