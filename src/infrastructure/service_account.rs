// Service-account OAuth2 (JWT bearer grant) token provider
use crate::infrastructure::config::{ConfigError, ServiceAccountCredentials};
use crate::infrastructure::upstream::{UpstreamError, status_error};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct ServiceAccountAuth {
    client_email: String,
    key: EncodingKey,
    token_uri: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Parses the private key up front so a bad key fails at startup.
    pub fn new(
        credentials: &ServiceAccountCredentials,
        token_uri: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| ConfigError::ClientInit(format!("invalid private key: {e}")))?;

        Ok(Self {
            client_email: credentials.client_email.clone(),
            key,
            token_uri: token_uri.into(),
            http,
            cached: Mutex::new(None),
        })
    }

    /// A valid access token, reusing the cached one while it is fresh.
    pub async fn access_token(&self) -> Result<String, UpstreamError> {
        // Held across the exchange so concurrent callers share one request
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting access token for {}", self.client_email);
        let token = self.exchange(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Signed RS256 assertion for the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, UpstreamError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: ANALYTICS_READONLY_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, UpstreamError> {
        let assertion = self.assertion(now)?;
        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );

        let response = self
            .http
            .post(&self.token_uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
