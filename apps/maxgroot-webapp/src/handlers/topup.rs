use super::{invalid_params, read_body, relay};
use crate::caller::VerifiedCaller;
use crate::models::{present, CreateTopup, TopupCreateRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use tracing::info;

const MISSING_PARAMS: &str = "telegramId and amount are required";

pub async fn create_topup(
    State(state): State<AppState>,
    caller: VerifiedCaller,
    payload: Result<Json<TopupCreateRequest>, JsonRejection>,
) -> Response {
    let request = match read_body(payload, MISSING_PARAMS) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let amount = request
        .amount
        .filter(|amount| amount.as_f64().is_some_and(|v| v != 0.0));
    let (Some(telegram_id), Some(amount)) = (present(request.telegram_id), amount) else {
        return invalid_params(MISSING_PARAMS);
    };
    if let Err(response) = caller.ensure_account(&telegram_id) {
        return response;
    }

    info!("Topup create request: user={} amount={}", telegram_id.as_str(), amount);
    relay(
        state
            .billing
            .create_topup(&CreateTopup {
                telegram_id,
                amount,
            })
            .await,
    )
}

/// Polled by the Mini App while the payment page is open.
pub async fn topup_status(Path(order_id): Path<String>, State(state): State<AppState>) -> Response {
    relay(state.billing.get_topup_status(&order_id).await)
}
