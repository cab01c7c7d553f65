//! Verified Telegram caller for routes that move money or grant access.

use crate::error::error_response;
use crate::models::TelegramId;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::Response,
};
use maxgroot_auth::{TrustError, VerifiedIdentity};
use tracing::warn;

/// Raw `initData` as sent by the Mini App.
pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";

const TMA_AUTH_SCHEME: &str = "tma ";

/// Extracting this fails unless the request carries launch data whose
/// signature, freshness and user object all check out. Reduced-trust mode
/// never produces one.
#[derive(Debug)]
pub struct VerifiedCaller {
    pub identity: VerifiedIdentity,
}

impl VerifiedCaller {
    /// The account named in the request body must be the caller's own.
    pub fn ensure_account(&self, telegram_id: &TelegramId) -> Result<(), Response> {
        if telegram_id.is_account(self.identity.id) {
            return Ok(());
        }
        warn!(
            "Caller {} tried to act on account {}",
            self.identity.id,
            telegram_id.as_str()
        );
        Err(error_response(
            StatusCode::FORBIDDEN,
            "IDENTITY_MISMATCH",
            "telegramId does not match the authenticated user",
        ))
    }
}

impl FromRequestParts<AppState> for VerifiedCaller {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let Some(raw) = init_data_from_headers(&parts.headers) else {
            return Err(unauthorized("Telegram launch data is required"));
        };

        let launch = match state.authenticator.authenticate(raw).require_verified() {
            Ok(launch) => launch,
            Err(TrustError::Unverified) => {
                return Err(error_response(
                    StatusCode::FORBIDDEN,
                    "UNVERIFIED_IDENTITY",
                    "Launch data cannot be verified by this server",
                ));
            }
            Err(TrustError::Rejected(_)) => {
                return Err(unauthorized("Invalid initData signature"));
            }
        };

        let now = chrono::Utc::now().timestamp();
        if !launch.is_fresh(now, state.config.init_data_max_age()) {
            return Err(unauthorized("Launch data has expired"));
        }

        match launch.into_parts() {
            (_, Some(identity)) => Ok(Self { identity }),
            (_, None) => Err(unauthorized("Launch data carries no user")),
        }
    }
}

fn init_data_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(raw) = headers
        .get(INIT_DATA_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|raw| !raw.is_empty())
    {
        return Some(raw);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(TMA_AUTH_SCHEME))
        .filter(|raw| !raw.is_empty())
}

fn unauthorized(message: &str) -> Response {
    error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
}
