use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{error, warn};

use crate::audit::report::Report;
use crate::error::AuditError;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub url: Option<String>,
}

/// POST /api/analyze — run a full analysis of `{"url": ...}`.
///
/// A body that is not a JSON object carrying a URL is treated as a missing URL.
pub async fn analyze(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Report>, AuditError> {
    let request: AnalyzeRequest = serde_json::from_slice(&body).unwrap_or_default();

    match state.auditor.analyze(request.url.as_deref()).await {
        Ok(report) => Ok(Json(report)),
        Err(e) if e.is_invalid_input() => {
            warn!("Rejected analysis request: {}", e);
            Err(e)
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(e)
        }
    }
}
