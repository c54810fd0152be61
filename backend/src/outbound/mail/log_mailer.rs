//! Development transport that writes verification codes to the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailerError, VerificationEmail, VerificationMailer};

/// Mailer used when no relay is configured. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<(), MailerError> {
        info!(
            recipient = %email.to,
            code = email.code.as_str(),
            "verification email not sent; no relay configured"
        );
        Ok(())
    }
}
