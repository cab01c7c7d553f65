use super::relay;
use crate::AppState;
use axum::{extract::State, response::Response};

pub async fn list_plans(State(state): State<AppState>) -> Response {
    let billing = state.billing.clone();
    let result = state
        .plans_cache
        .get_or_fetch(|| async move { billing.get_plans().await })
        .await;
    relay(result)
}
