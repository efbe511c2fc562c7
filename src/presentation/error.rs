// HTTP error responses
use crate::presentation::responses::ErrorBody;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch analytics data")]
    Upstream { message: String },
}

impl ApiError {
    pub fn upstream(err: &anyhow::Error) -> Self {
        Self::Upstream {
            message: err.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            message: match self {
                ApiError::Upstream { message } => message,
            },
        };
        (status, Json(body)).into_response()
    }
}
