pub mod app;
pub mod auth;
pub mod health;
pub mod plans;
pub mod promo;
pub mod subscription;
pub mod topup;
pub mod user;

use crate::error::{error_response, BillingError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Upstream JSON goes back to the client untouched.
pub(crate) fn relay(result: Result<Value, BillingError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) fn invalid_params(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID_PARAMS", message)
}

/// Unreadable bodies get the same answer as bodies missing fields.
pub(crate) fn read_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection);
            Err(invalid_params(message))
        }
    }
}
