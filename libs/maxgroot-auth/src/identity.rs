use crate::launch_data::{self, Claims};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

const USER_FIELD: &str = "user";

/// The `user` object of Telegram launch data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A user taken from claims whose signature checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerifiedIdentity(TelegramUser);

impl VerifiedIdentity {
    pub fn user(&self) -> &TelegramUser {
        &self.0
    }
}

impl Deref for VerifiedIdentity {
    type Target = TelegramUser;

    fn deref(&self) -> &TelegramUser {
        &self.0
    }
}

/// A user read from launch data without any signature check. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnverifiedIdentity(TelegramUser);

impl UnverifiedIdentity {
    pub fn user(&self) -> &TelegramUser {
        &self.0
    }
}

/// Parses `claims["user"]`. A missing field, invalid JSON, or a blob
/// without `id` all give `None`.
pub fn extract_identity(claims: &Claims) -> Option<VerifiedIdentity> {
    claims
        .get(USER_FIELD)
        .and_then(parse_user)
        .map(VerifiedIdentity)
}

/// Reads `user` straight out of raw launch data, skipping verification.
pub fn parse_unverified_identity(raw: &str) -> Option<UnverifiedIdentity> {
    launch_data::parse_pairs(raw)
        .get(USER_FIELD)
        .and_then(|json| parse_user(json))
        .map(UnverifiedIdentity)
}

fn parse_user(json: &str) -> Option<TelegramUser> {
    serde_json::from_str(json).ok()
}
