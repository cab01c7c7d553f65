use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use maxgroot_auth::{Authentication, UnverifiedIdentity, VerifiedIdentity};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub const REDUCED_TRUST_WARNING: &str = "BOT_TOKEN not configured - validation skipped";

#[derive(Deserialize)]
pub struct InitDataRequest {
    #[serde(default, alias = "initData")]
    pub init_data: Option<String>,
}

#[derive(Serialize)]
struct VerifiedResponse<'a> {
    valid: bool,
    user: Option<&'a VerifiedIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_id: Option<&'a str>,
}

#[derive(Serialize)]
struct UnverifiedResponse<'a> {
    valid: bool,
    warning: &'static str,
    user: Option<&'a UnverifiedIdentity>,
    raw: &'a str,
}

pub async fn auth_telegram(
    State(state): State<AppState>,
    payload: Result<Json<InitDataRequest>, JsonRejection>,
) -> Response {
    let init_data = match payload {
        Ok(Json(InitDataRequest {
            init_data: Some(data),
        })) if !data.is_empty() => data,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "initData is required" })),
            )
                .into_response();
        }
    };

    match state.authenticator.authenticate(&init_data) {
        Authentication::Verified(launch) => {
            let identity = launch.identity();
            info!(
                "Launch data verified for user {:?}",
                identity.map(|user| user.id)
            );
            Json(VerifiedResponse {
                valid: true,
                user: identity,
                auth_date: launch.claims().get("auth_date"),
                query_id: launch.claims().query_id(),
            })
            .into_response()
        }
        Authentication::Unverified { identity } => Json(UnverifiedResponse {
            valid: false,
            warning: REDUCED_TRUST_WARNING,
            user: identity.as_ref(),
            raw: &init_data,
        })
        .into_response(),
        Authentication::Rejected(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid initData signature" })),
        )
            .into_response(),
    }
}
