//! Read-only account lookups, forwarded as-is.

use super::relay;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SubscriptionsQuery {
    pub active: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopupsQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
}

pub async fn get_user(Path(telegram_id): Path<String>, State(state): State<AppState>) -> Response {
    relay(state.billing.get_user(&telegram_id).await)
}

pub async fn get_balance(
    Path(telegram_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    relay(state.billing.get_balance(&telegram_id).await)
}

pub async fn get_stats(Path(telegram_id): Path<String>, State(state): State<AppState>) -> Response {
    relay(state.billing.get_user_stats(&telegram_id).await)
}

pub async fn get_subscriptions(
    Path(telegram_id): Path<String>,
    Query(params): Query<SubscriptionsQuery>,
    State(state): State<AppState>,
) -> Response {
    let active = params.active.as_deref().filter(|v| !v.is_empty());
    relay(state.billing.get_subscriptions(&telegram_id, active).await)
}

pub async fn get_promo(Path(telegram_id): Path<String>, State(state): State<AppState>) -> Response {
    relay(state.billing.get_user_promo(&telegram_id).await)
}

pub async fn get_topups(
    Path(telegram_id): Path<String>,
    Query(params): Query<TopupsQuery>,
    State(state): State<AppState>,
) -> Response {
    let status = params.status.as_deref().filter(|v| !v.is_empty());
    let limit = params.limit.as_deref().filter(|v| !v.is_empty());
    relay(
        state
            .billing
            .get_user_topups(&telegram_id, status, limit)
            .await,
    )
}
