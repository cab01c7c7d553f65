use super::{invalid_params, read_body, relay};
use crate::caller::VerifiedCaller;
use crate::models::{present, BuySubscription, BuySubscriptionRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use tracing::info;

const MISSING_PARAMS: &str = "telegramId and planId are required";

pub async fn buy_subscription(
    State(state): State<AppState>,
    caller: VerifiedCaller,
    payload: Result<Json<BuySubscriptionRequest>, JsonRejection>,
) -> Response {
    let request = match read_body(payload, MISSING_PARAMS) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let plan_id = request.plan_id.filter(|id| !id.trim().is_empty());
    let (Some(telegram_id), Some(plan_id)) = (present(request.telegram_id), plan_id) else {
        return invalid_params(MISSING_PARAMS);
    };
    if let Err(response) = caller.ensure_account(&telegram_id) {
        return response;
    }

    info!("Subscription purchase: user={} plan={}", telegram_id.as_str(), plan_id);
    relay(
        state
            .billing
            .buy_subscription(&BuySubscription {
                telegram_id,
                plan_id,
            })
            .await,
    )
}
