use crate::error::BillingError;
use crate::models::{ActivatePromo, BuySubscription, CreateTopup};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Identifies this backend to the Billing API.
pub const WEBAPP_SECRET_HEADER: &str = "X-Webapp-Secret";

#[derive(Clone)]
pub struct BillingClient {
    client: Client,
    base_url: String,
    api_secret: String,
}

impl BillingClient {
    pub fn new(base_url: String, api_secret: String, timeout: Duration) -> Result<Self> {
        // reqwest is built without a bundled provider; the first install wins.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(timeout)
            .build()
            .context("Failed to initialize Billing API client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_secret,
        })
    }

    pub async fn get_plans(&self) -> Result<Value, BillingError> {
        self.get("/plans").await
    }

    pub async fn get_user(&self, telegram_id: &str) -> Result<Value, BillingError> {
        self.get(&format!("/user/{}", urlencoding::encode(telegram_id)))
            .await
    }

    pub async fn get_balance(&self, telegram_id: &str) -> Result<Value, BillingError> {
        self.get(&format!("/user/{}/balance", urlencoding::encode(telegram_id)))
            .await
    }

    pub async fn get_user_stats(&self, telegram_id: &str) -> Result<Value, BillingError> {
        self.get(&format!("/user/{}/stats", urlencoding::encode(telegram_id)))
            .await
    }

    pub async fn get_subscriptions(
        &self,
        telegram_id: &str,
        active: Option<&str>,
    ) -> Result<Value, BillingError> {
        let path = format!("/user/{}/subscriptions", urlencoding::encode(telegram_id));
        self.get(&with_query(path, &[("active", active)])).await
    }

    pub async fn get_user_promo(&self, telegram_id: &str) -> Result<Value, BillingError> {
        self.get(&format!("/user/{}/promo", urlencoding::encode(telegram_id)))
            .await
    }

    pub async fn get_user_topups(
        &self,
        telegram_id: &str,
        status: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Value, BillingError> {
        let path = format!("/user/{}/topups", urlencoding::encode(telegram_id));
        self.get(&with_query(path, &[("status", status), ("limit", limit)]))
            .await
    }

    pub async fn create_topup(&self, body: &CreateTopup) -> Result<Value, BillingError> {
        self.post("/topup/create", body).await
    }

    pub async fn get_topup_status(&self, order_id: &str) -> Result<Value, BillingError> {
        self.get(&format!("/topup/{}/status", urlencoding::encode(order_id)))
            .await
    }

    pub async fn buy_subscription(&self, body: &BuySubscription) -> Result<Value, BillingError> {
        self.post("/subscription/buy", body).await
    }

    pub async fn activate_promo(&self, body: &ActivatePromo) -> Result<Value, BillingError> {
        self.post("/promo/activate", body).await
    }

    async fn get(&self, path: &str) -> Result<Value, BillingError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Billing API GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(WEBAPP_SECRET_HEADER, &self.api_secret)
            .send()
            .await?;

        read_json(response).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, BillingError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Billing API POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(WEBAPP_SECRET_HEADER, &self.api_secret)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }
}

fn with_query(path: String, params: &[(&str, Option<&str>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value.map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();

    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

async fn read_json(response: Response) -> Result<Value, BillingError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| format!("Billing API returned {}", status.as_u16()));
        return Err(BillingError::Upstream { status, message });
    }

    Ok(serde_json::from_str(&body)?)
}
