//! Port for delivering verification codes by email.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, VerificationCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailerError {
        /// The transport did not answer in time.
        Timeout { message: String } => "mail transport timed out: {message}",
        /// The transport answered but refused the message.
        Rejected { message: String } => "mail transport rejected the message: {message}",
        /// The transport could not be reached or configured.
        Transport { message: String } => "mail transport failed: {message}",
    }
}

/// Verification message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub to: EmailAddress,
    pub display_name: DisplayName,
    pub code: VerificationCode,
}

/// Outbound mail channel for verification codes. Sends are never retried
/// automatically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    async fn send(&self, email: &VerificationEmail) -> Result<(), MailerError>;
}
