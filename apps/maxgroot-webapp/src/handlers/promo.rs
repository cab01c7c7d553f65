use super::{invalid_params, read_body, relay};
use crate::caller::VerifiedCaller;
use crate::models::{present, ActivatePromo, PromoActivateRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use tracing::info;

const MISSING_PARAMS: &str = "telegramId and code are required";

pub async fn activate_promo(
    State(state): State<AppState>,
    caller: VerifiedCaller,
    payload: Result<Json<PromoActivateRequest>, JsonRejection>,
) -> Response {
    let request = match read_body(payload, MISSING_PARAMS) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let code = request
        .code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());
    let (Some(telegram_id), Some(code)) = (present(request.telegram_id), code) else {
        return invalid_params(MISSING_PARAMS);
    };
    if let Err(response) = caller.ensure_account(&telegram_id) {
        return response;
    }

    // The code itself is not logged.
    info!("Promo activation: user={}", telegram_id.as_str());
    relay(
        state
            .billing
            .activate_promo(&ActivatePromo { telegram_id, code })
            .await,
    )
}
