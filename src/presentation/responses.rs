// JSON bodies that are not part of the dashboard envelope
use crate::infrastructure::config::CredentialPresence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub environment: EnvironmentReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    #[serde(rename = "hasGoogleClientEmail")]
    pub has_google_client_email: bool,
    #[serde(rename = "hasGooglePrivateKey")]
    pub has_google_private_key: bool,
    #[serde(rename = "hasGAPropertyId")]
    pub has_ga_property_id: bool,
}

impl From<CredentialPresence> for EnvironmentReport {
    fn from(presence: CredentialPresence) -> Self {
        Self {
            has_google_client_email: presence.has_google_client_email,
            has_google_private_key: presence.has_google_private_key,
            has_ga_property_id: presence.has_ga_property_id,
        }
    }
}
