pub mod billing_client;
pub mod caller;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod plan_cache;

use crate::billing_client::BillingClient;
use crate::config::WebappConfig;
use crate::plan_cache::PlanCache;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use maxgroot_auth::LaunchAuthenticator;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebappConfig>,
    pub authenticator: Arc<LaunchAuthenticator>,
    pub billing: BillingClient,
    pub plans_cache: PlanCache,
}

impl AppState {
    pub fn new(config: WebappConfig) -> anyhow::Result<Self> {
        let billing = BillingClient::new(
            config.api_url.clone(),
            config.api_secret.clone(),
            config.upstream_timeout(),
        )?;
        let authenticator = LaunchAuthenticator::new(config.bot_secret());
        let plans_cache = PlanCache::new(config.plans_cache_ttl());

        Ok(Self {
            config: Arc::new(config),
            authenticator: Arc::new(authenticator),
            billing,
            plans_cache,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Launch data verification
        .route("/api/auth/telegram", post(handlers::auth::auth_telegram))
        // Billing API proxy
        .route("/api/plans", get(handlers::plans::list_plans))
        .route("/api/user/{telegram_id}", get(handlers::user::get_user))
        .route(
            "/api/user/{telegram_id}/balance",
            get(handlers::user::get_balance),
        )
        .route("/api/user/{telegram_id}/stats", get(handlers::user::get_stats))
        .route(
            "/api/user/{telegram_id}/subscriptions",
            get(handlers::user::get_subscriptions),
        )
        .route("/api/user/{telegram_id}/promo", get(handlers::user::get_promo))
        .route(
            "/api/user/{telegram_id}/topups",
            get(handlers::user::get_topups),
        )
        .route("/api/topup/create", post(handlers::topup::create_topup))
        .route(
            "/api/topup/{order_id}/status",
            get(handlers::topup::topup_status),
        )
        .route(
            "/api/subscription/buy",
            post(handlers::subscription::buy_subscription),
        )
        .route("/api/promo/activate", post(handlers::promo::activate_promo))
        // Mini App (static files)
        .route("/app", get(handlers::app::serve_app))
        .route("/app/{*path}", get(handlers::app::serve_app_assets))
        .layer(CatchPanicLayer::custom(internal_error))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn internal_error(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
