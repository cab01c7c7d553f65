use crate::identity::{self, UnverifiedIdentity, VerifiedIdentity};
use crate::launch_data::{self, Claims, InvalidReason, VerificationResult};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Value shipped in sample `.env` files; never a real token.
pub const BOT_TOKEN_PLACEHOLDER: &str = "your_bot_token_here";

/// Launch data signed slightly in the future still counts as fresh.
const ALLOWED_CLOCK_SKEW_SECS: i64 = 60;

/// Bot token used as key material. `Debug` never prints it.
#[derive(Clone)]
pub struct BotSecret(String);

impl BotSecret {
    /// `None` for empty tokens and the sample placeholder.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() || token == BOT_TOKEN_PLACEHOLDER {
            return None;
        }
        Some(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedLaunch {
    claims: Claims,
    identity: Option<VerifiedIdentity>,
}

impl VerifiedLaunch {
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        self.identity.as_ref()
    }

    pub fn into_parts(self) -> (Claims, Option<VerifiedIdentity>) {
        (self.claims, self.identity)
    }

    /// Whether `auth_date` lies within `max_age` of `now_unix`.
    pub fn is_fresh(&self, now_unix: i64, max_age: Duration) -> bool {
        let Some(signed_at) = self.claims.auth_date() else {
            return false;
        };
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let age = now_unix.saturating_sub(signed_at);
        (-ALLOWED_CLOCK_SKEW_SECS..=max_age).contains(&age)
    }
}

/// Outcome of checking launch data under the server's trust configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Verified(VerifiedLaunch),
    /// Reduced-trust mode: no bot secret is configured, so the payload was
    /// parsed but its signature was never checked.
    Unverified { identity: Option<UnverifiedIdentity> },
    Rejected(InvalidReason),
}

impl Authentication {
    pub fn require_verified(self) -> Result<VerifiedLaunch, TrustError> {
        match self {
            Self::Verified(launch) => Ok(launch),
            Self::Unverified { .. } => Err(TrustError::Unverified),
            Self::Rejected(reason) => Err(TrustError::Rejected(reason)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrustError {
    #[error("bot secret is not configured, launch data is unverified")]
    Unverified,
    #[error("launch data rejected: {0}")]
    Rejected(#[from] InvalidReason),
}

#[derive(Debug, Clone)]
pub struct LaunchAuthenticator {
    secret: Option<BotSecret>,
}

impl LaunchAuthenticator {
    pub fn new(secret: Option<BotSecret>) -> Self {
        Self { secret }
    }

    pub fn is_reduced_trust(&self) -> bool {
        self.secret.is_none()
    }

    pub fn authenticate(&self, raw: &str) -> Authentication {
        let Some(secret) = &self.secret else {
            warn!("Bot token not configured, launch data accepted without verification");
            return Authentication::Unverified {
                identity: identity::parse_unverified_identity(raw),
            };
        };

        match launch_data::verify(raw, secret.expose()) {
            VerificationResult::Valid { claims } => {
                let identity = identity::extract_identity(&claims);
                if identity.is_none() {
                    debug!("Verified launch data carries no usable user object");
                }
                Authentication::Verified(VerifiedLaunch { claims, identity })
            }
            VerificationResult::Invalid(reason) => {
                warn!("Launch data rejected: {}", reason);
                Authentication::Rejected(reason)
            }
        }
    }
}
