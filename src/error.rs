use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Terminal outcome of a rejected webhook request. Only the status string is
/// returned to the caller; details go to the log.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook token mismatch")]
    Forbidden,

    #[error("request body is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("failed to process update: {0:#}")]
    Processing(anyhow::Error),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Forbidden => StatusCode::FORBIDDEN,
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn status_text(&self) -> &'static str {
        match self {
            WebhookError::Forbidden => "forbidden",
            WebhookError::MalformedPayload(_) => "bad request",
            WebhookError::Processing(_) => "error",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "status": self.status_text() })),
        )
            .into_response()
    }
}
