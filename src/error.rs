use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrlFormat,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Failed to load or analyze page: {0}")]
    Probe(String),

    #[error("Failed to load or analyze page: navigation timed out after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AuditError {
    /// Rejected before any network activity.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            AuditError::MissingUrl | AuditError::InvalidUrlFormat | AuditError::InvalidUrl
        )
    }
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_invalid_input() {
            (StatusCode::BAD_REQUEST, self.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis failed: {}", self),
            )
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
