use crate::error::BillingError;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct CachedPlans {
    fetched_at: Instant,
    body: Value,
}

/// Keeps the last successful `/plans` response for `ttl`. A zero ttl
/// disables caching.
#[derive(Clone)]
pub struct PlanCache {
    ttl: Duration,
    entry: Arc<RwLock<Option<CachedPlans>>>,
}

impl PlanCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Value, BillingError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, BillingError>>,
    {
        if self.ttl.is_zero() {
            return fetch().await;
        }

        if let Some(cached) = self.entry.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!("Serving plans from cache");
                return Ok(cached.body.clone());
            }
        }

        let body = fetch().await?;
        // `{ ok: false }` is an application-level failure, not worth keeping.
        if body.get("ok") != Some(&Value::Bool(false)) {
            *self.entry.write().await = Some(CachedPlans {
                fetched_at: Instant::now(),
                body: body.clone(),
            });
        }

        Ok(body)
    }
}
