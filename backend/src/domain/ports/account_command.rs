//! Driving port for account registration, verification, and sign-in.
//!
//! Inbound adapters call this port and receive opaque [`Error`] values; distinctions that would leak account
//! existence are logged by the service and never returned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, Error, LoginCredentials, RegistrationForm, UserProfile};

use super::SessionToken;

/// Result of a registration or resend: where the code went and when another
/// may be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub email: EmailAddress,
    pub sent_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
    pub resend_interval_secs: i64,
}

/// Signed-in user and the token to place in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub profile: UserProfile,
    pub token: SessionToken,
}

/// Verification request: the email and the code the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyAccountRequest {
    pub email: EmailAddress,
    pub code: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Validate the form, create a pending account, and email its first code.
    async fn register(&self, form: RegistrationForm) -> Result<RegistrationReceipt, Error>;

    /// Email a new code to a pending account once the cooldown has passed.
    async fn resend_code(&self, email: &EmailAddress) -> Result<RegistrationReceipt, Error>;

    /// Activate a pending account and open a session.
    async fn verify(&self, request: VerifyAccountRequest) -> Result<AuthenticatedSession, Error>;

    /// Check credentials of an active account and open a session.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error>;
}
