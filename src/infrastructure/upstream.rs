// Errors talking to Google APIs
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; `message` is Google's own message when the body
    /// carries one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("failed to sign service-account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Google API errors (`{"error": {...}}`) and OAuth errors
/// (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Api {
        error: ApiErrorDetail,
    },
    OAuth {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turn a failed response into an [`UpstreamError::Status`].
pub async fn status_error(response: reqwest::Response) -> UpstreamError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    UpstreamError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Api { error }) => error.message,
        Ok(ErrorBody::OAuth {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(ErrorBody::OAuth { error, .. }) => error,
        Err(_) if body.trim().is_empty() => format!("upstream request failed with status {status}"),
        Err(_) => format!("upstream request failed with status {status}: {}", body.trim()),
    }
}
