use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Telegram account id as the Billing API expects it: a decimal string.
/// Clients send it either as a string or as a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TelegramId(String);

impl TelegramId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_account(&self, id: i64) -> bool {
        self.0 == id.to_string()
    }
}

impl From<i64> for TelegramId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for TelegramId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text.trim().to_string()),
            Raw::Number(id) => Self(id.to_string()),
        })
    }
}

/// A body field counts as given when present and non-empty.
pub fn present(id: Option<TelegramId>) -> Option<TelegramId> {
    id.filter(|id| !id.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopupCreateRequest {
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
    #[serde(default)]
    pub amount: Option<Number>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySubscriptionRequest {
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoActivateRequest {
    #[serde(default)]
    pub telegram_id: Option<TelegramId>,
    #[serde(default)]
    pub code: Option<String>,
}

// Bodies sent to the Billing API.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopup {
    pub telegram_id: TelegramId,
    pub amount: Number,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySubscription {
    pub telegram_id: TelegramId,
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePromo {
    pub telegram_id: TelegramId,
    pub code: String,
}
