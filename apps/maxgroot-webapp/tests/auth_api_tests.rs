mod common;

use common::{launch_data, spawn_webapp, test_config, BOT_TOKEN};
use serde_json::{json, Value};

const E2E_RAW: &str = "auth_date=1700000000&user=%7B%22id%22%3A42%7D&hash=2a6eae353a67d828e126390fd8d2e31a9a5a278bffeed807fe291f6bb08c36d2";

async fn post_auth(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/auth/telegram", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn valid_launch_data_returns_identity() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;
    let raw = launch_data(
        &[
            ("auth_date", "1700000000"),
            ("query_id", "AA"),
            ("user", r#"{"id":42,"first_name":"A","username":"alice"}"#),
        ],
        BOT_TOKEN,
    );

    let resp = post_auth(&base, json!({ "initData": raw })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"], json!({"id": 42, "first_name": "A", "username": "alice"}));
    assert_eq!(body["auth_date"], "1700000000");
    assert_eq!(body["query_id"], "AA");
}

#[tokio::test]
async fn pinned_scenario_verifies() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some("TESTBOT"))).await;

    let resp = post_auth(&base, json!({ "initData": E2E_RAW })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"], json!({"id": 42}));
    assert!(body.get("query_id").is_none());
}

#[tokio::test]
async fn wrong_secret_is_unauthorized() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some("WRONGBOT"))).await;

    let resp = post_auth(&base, json!({ "initData": E2E_RAW })).await;
    assert_eq!(resp.status(), 401);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Invalid initData signature"}));
}

#[tokio::test]
async fn missing_hash_is_unauthorized() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;

    let resp = post_auth(&base, json!({ "initData": "auth_date=1&user=%7B%22id%22%3A1%7D" })).await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn valid_signature_with_bad_user_still_valid() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;
    let raw = launch_data(&[("auth_date", "1"), ("user", "not-json")], BOT_TOKEN);

    let resp = post_auth(&base, json!({ "initData": raw })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn missing_or_empty_init_data_is_bad_request() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;

    for body in [json!({}), json!({ "initData": "" }), json!({ "initData": null })] {
        let resp = post_auth(&base, body.clone()).await;
        assert_eq!(resp.status(), 400, "body {}", body);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "initData is required");
    }
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/auth/telegram", base))
        .header("content-type", "application/json")
        .body("initData=oops")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn snake_case_field_is_accepted() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some("TESTBOT"))).await;

    let resp = post_auth(&base, json!({ "init_data": E2E_RAW })).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn reduced_trust_mode_labels_identity_unverified() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", None)).await;
    let raw = "auth_date=1&user=%7B%22id%22%3A7%2C%22first_name%22%3A%22Bo%22%7D&hash=forged";

    let resp = post_auth(&base, json!({ "initData": raw })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], false);
    assert_eq!(body["warning"], "BOT_TOKEN not configured - validation skipped");
    assert_eq!(body["user"], json!({"id": 7, "first_name": "Bo"}));
    assert_eq!(body["raw"], raw);
}

#[tokio::test]
async fn placeholder_token_is_reduced_trust() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some("your_bot_token_here"))).await;

    let resp = post_auth(&base, json!({ "initData": "user=not-json" })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], false);
    assert_eq!(body["user"], Value::Null);
}

#[tokio::test]
async fn health_reports_trust_mode_without_secrets() {
    let base = spawn_webapp(test_config("http://127.0.0.1:9/api", Some(BOT_TOKEN))).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let text = resp.text().await.unwrap();
    assert!(!text.contains(BOT_TOKEN));
    assert!(!text.contains(common::API_SECRET));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["bot_secret_configured"], true);
}
