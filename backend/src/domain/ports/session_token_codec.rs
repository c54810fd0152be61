//! Port for issuing and verifying signed session tokens.
//!
//! Tokens are self-contained bearer credentials carrying the user id, email,
//! and display name. Verification is a pure function of the token, the
//! signing secret, and the codec's clock.

use chrono::{DateTime, Utc};

use crate::domain::{DisplayName, EmailAddress, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session token codecs.
    pub enum SessionTokenError {
        /// Malformed, tampered, or expired token. Callers treat this exactly
        /// like a missing token.
        VerificationFailed => "session token could not be verified",
        /// The token could not be produced.
        Signing { message: String } => "session token signing failed: {message}",
    }
}

/// Identity carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
}

/// Encoded token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue and verify session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokenCodec: Send + Sync {
    /// Sign a token for `identity` valid for the codec's TTL.
    fn issue(&self, identity: &SessionIdentity) -> Result<SessionToken, SessionTokenError>;

    /// Check signature and expiry and recover the identity.
    fn verify(&self, token: &str) -> Result<SessionIdentity, SessionTokenError>;
}
