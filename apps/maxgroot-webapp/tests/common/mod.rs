#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use maxgroot_webapp::{build_router, config::WebappConfig, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const BOT_TOKEN: &str = "TESTBOT";
pub const API_SECRET: &str = "test-webapp-secret";

/// One request as seen by the fake Billing API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path_and_query: String,
    pub secret: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct BillingLog(Arc<Mutex<Vec<Recorded>>>);

impl BillingLog {
    pub fn requests(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.path_and_query == path)
            .count()
    }
}

async fn fake_billing(
    State(log): State<BillingLog>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    log.0.lock().unwrap().push(Recorded {
        method,
        path_and_query: path_and_query.clone(),
        secret: headers
            .get("x-webapp-secret")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_str(&body).ok(),
    });

    match uri.path() {
        "/api/plans" => Json(json!({
            "ok": true,
            "data": [
                {"id": "m1", "label": "1 month", "price": 150, "months": 1, "pricePerMonth": 150},
                {"id": "m3", "label": "3 months", "price": 390, "months": 3, "pricePerMonth": 130}
            ]
        }))
        .into_response(),
        "/api/user/404" => (
            StatusCode::NOT_FOUND,
            Json(json!({"ok": false, "error": "USER_NOT_FOUND", "message": "User not found"})),
        )
            .into_response(),
        "/api/user/500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "/api/user/garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "/api/topup/create" => Json(json!({
            "ok": true,
            "data": {"topupId": 1, "orderId": "ORD-1", "amount": 270, "paymentUrl": "https://pay.example/ORD-1", "isFallback": false}
        }))
        .into_response(),
        "/api/subscription/buy" => (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "ok": false,
                "error": "INSUFFICIENT_BALANCE",
                "message": "Not enough balance",
                "data": {"balance": 100, "required": 150, "shortage": 50}
            })),
        )
            .into_response(),
        path => Json(json!({"ok": true, "path": path})).into_response(),
    }
}

/// Fake Billing API on an OS-assigned port. Returns its `/api` base URL.
pub async fn spawn_billing() -> (String, BillingLog) {
    let log = BillingLog::default();
    let app = Router::new().fallback(fake_billing).with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}/api", port), log)
}

/// A base URL nothing listens on.
pub async fn dead_billing_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}

pub fn test_config(api_url: &str, bot_token: Option<&str>) -> WebappConfig {
    WebappConfig {
        bot_token: bot_token.map(str::to_owned),
        api_url: api_url.to_string(),
        api_secret: API_SECRET.to_string(),
        listen_port: 0,
        mini_app_dir: PathBuf::from("dist"),
        plans_cache_ttl_secs: 300,
        init_data_max_age_secs: 86_400,
        upstream_timeout_secs: 5,
    }
}

/// Runs the webapp router on an OS-assigned port, returning its base URL.
pub async fn spawn_webapp(config: WebappConfig) -> String {
    let app = build_router(AppState::new(config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

/// Launch data the way a Telegram client would sign it.
pub fn launch_data(pairs: &[(&str, &str)], secret: &str) -> String {
    let hash = maxgroot_auth::sign(pairs.iter().copied(), secret);
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    serializer.append_pair("hash", &hash);
    serializer.finish()
}

/// Freshly signed launch data for user `id`.
pub fn launch_data_for(id: i64, secret: &str) -> String {
    let auth_date = chrono::Utc::now().timestamp().to_string();
    let user = format!(r#"{{"id":{},"first_name":"Test"}}"#, id);
    launch_data(
        &[("auth_date", auth_date.as_str()), ("query_id", "AAQ"), ("user", user.as_str())],
        secret,
    )
}
