//! Authentication of Telegram Mini App launch data.

pub mod identity;
pub mod launch_data;
pub mod trust;

pub use identity::{
    TelegramUser, UnverifiedIdentity, VerifiedIdentity, extract_identity,
    parse_unverified_identity,
};
pub use launch_data::{Claims, InvalidReason, VerificationResult, sign, verify};
pub use trust::{Authentication, BotSecret, LaunchAuthenticator, TrustError, VerifiedLaunch};
