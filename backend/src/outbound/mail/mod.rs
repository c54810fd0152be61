//! Verification mail transports.
//!
//! - [`HttpRelayMailer`]: JSON POST to an HTTP mail relay.
//! - [`LogMailer`]: logs the code instead of sending it (development).
//! - [`MailTransport`]: whichever of the two startup configuration selected.

mod http_relay_mailer;
mod log_mailer;
mod message;

use async_trait::async_trait;

pub use http_relay_mailer::{HttpRelayConfig, HttpRelayMailer};
pub use log_mailer::LogMailer;

use crate::domain::ports::{MailerError, VerificationEmail, VerificationMailer};

/// Transport chosen at startup.
pub enum MailTransport {
    Relay(HttpRelayMailer),
    Log(LogMailer),
}

impl MailTransport {
    /// Label used in startup logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Relay(_) => "http_relay",
            Self::Log(_) => "log",
        }
    }
}

#[async_trait]
impl VerificationMailer for MailTransport {
    async fn send(&self, email: &VerificationEmail) -> Result<(), MailerError> {
        match self {
            Self::Relay(mailer) => mailer.send(email).await,
            Self::Log(mailer) => mailer.send(email).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, EmailAddress, VerificationCode};

    #[tokio::test]
    async fn log_transport_always_succeeds() {
        let transport = MailTransport::Log(LogMailer);
        let email = VerificationEmail {
            to: EmailAddress::new("ana@example.com").expect("email"),
            display_name: DisplayName::new("Ana").expect("name"),
            code: VerificationCode::parse("000042").expect("code"),
        };
        assert_eq!(transport.kind(), "log");
        transport.send(&email).await.expect("log transport");
    }
}
