use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// `{ ok: false, error, message }`, the envelope the Billing API itself uses.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "ok": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Billing API returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Billing API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Billing API returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        match self {
            BillingError::Upstream { status, message } => {
                tracing::warn!("Billing API error {}: {}", status, message);
                error_response(status, "API_ERROR", message)
            }
            other => {
                tracing::error!("{}", other);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "Billing API is unavailable",
                )
            }
        }
    }
}
