//! Telegram Mini App launch data (`initData`) signature checks.
//!
//! <https://core.telegram.org/bots/webapps#validating-data-received-via-the-mini-app>

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";
const HASH_FIELD: &str = "hash";
const HASH_HEX_LEN: usize = 64;

/// Key/value pairs of a launch payload whose signature has been checked.
///
/// There is no public constructor: the only way to get one is a `Valid`
/// outcome of [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims(BTreeMap<String, String>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Unix timestamp at which the Telegram client signed the payload.
    pub fn auth_date(&self) -> Option<i64> {
        self.get("auth_date")?.parse().ok()
    }

    pub fn query_id(&self) -> Option<&str> {
        self.get("query_id")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("launch data has no hash field")]
    MalformedPayload,
    #[error("launch data signature mismatch")]
    SignatureMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid { claims: Claims },
    Invalid(InvalidReason),
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Valid { claims } => Some(claims),
            Self::Invalid(_) => None,
        }
    }
}

/// Decodes a query string into a key/value map. On duplicate keys the last
/// value wins.
pub fn parse_pairs(raw: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}

/// Renders pairs as sorted `key=value` lines joined by `\n`. Any `hash` pair
/// is left out.
pub fn data_check_string<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = pairs
        .into_iter()
        .filter(|(k, _)| k.as_ref() != HASH_FIELD)
        .collect();
    entries.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    entries
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Secret key = HMAC-SHA256(key = "WebAppData", message = bot token).
pub fn derive_secret_key(bot_secret: &str) -> [u8; 32] {
    let mut mac = keyed_mac(WEB_APP_DATA_KEY);
    mac.update(bot_secret.as_bytes());

    let mut key = [0u8; 32];
    key.copy_from_slice(&mac.finalize().into_bytes());
    key
}

/// Lowercase hex signature a Telegram client would attach to `pairs`.
pub fn sign<K, V>(pairs: impl IntoIterator<Item = (K, V)>, bot_secret: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mac = data_mac(&derive_secret_key(bot_secret), &data_check_string(pairs));
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `raw` launch data against the bot secret.
///
/// Never fails on attacker-controlled input; everything that is not a
/// correctly signed payload comes back as `Invalid`.
pub fn verify(raw: &str, bot_secret: &str) -> VerificationResult {
    let mut pairs = parse_pairs(raw);

    let Some(hash) = pairs.remove(HASH_FIELD) else {
        return VerificationResult::Invalid(InvalidReason::MalformedPayload);
    };

    let Some(supplied) = decode_lowercase_hex(&hash) else {
        return VerificationResult::Invalid(InvalidReason::SignatureMismatch);
    };

    let mac = data_mac(&derive_secret_key(bot_secret), &data_check_string(&pairs));
    match mac.verify_slice(&supplied) {
        Ok(()) => VerificationResult::Valid {
            claims: Claims(pairs),
        },
        Err(_) => VerificationResult::Invalid(InvalidReason::SignatureMismatch),
    }
}

fn keyed_mac(key: &[u8]) -> HmacSha256 {
    // HMAC takes keys of any length, InvalidLength cannot happen here.
    HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length")
}

fn data_mac(secret_key: &[u8; 32], data_check_string: &str) -> HmacSha256 {
    let mut mac = keyed_mac(secret_key);
    mac.update(data_check_string.as_bytes());
    mac
}

/// Only the exact encoding `hex::encode` produces is accepted.
fn decode_lowercase_hex(hash: &str) -> Option<Vec<u8>> {
    let canonical = hash.len() == HASH_HEX_LEN
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !canonical {
        return None;
    }
    hex::decode(hash).ok()
}
