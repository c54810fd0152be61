//! Reqwest-backed mail relay transport.
//!
//! Posts one JSON message per verification code to an HTTP relay. The
//! adapter owns transport details only: request serialisation, the send
//! timeout, and mapping of HTTP failures to [`MailerError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::message::RelayMessage;
use crate::domain::ports::{MailerError, VerificationEmail, VerificationMailer};

/// Relay endpoint, credentials, and limits.
pub struct HttpRelayConfig {
    pub endpoint: Url,
    /// Bearer token sent in the `Authorization` header, if any.
    pub token: Option<Zeroizing<String>>,
    /// `From` address of every message.
    pub sender: String,
    /// Upper bound for one send, connection included.
    pub timeout: Duration,
}

/// Mail transport that POSTs to an HTTP relay.
///
/// The `reqwest` client is built on first use and reused afterwards.
pub struct HttpRelayMailer {
    config: HttpRelayConfig,
    client: OnceCell<Client>,
}

impl HttpRelayMailer {
    pub fn new(config: HttpRelayConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Client, MailerError> {
        self.client
            .get_or_try_init(|| async {
                Client::builder()
                    .timeout(self.config.timeout)
                    .build()
                    .map_err(|err| MailerError::transport(format!("build client: {err}")))
            })
            .await
    }
}

#[async_trait]
impl VerificationMailer for HttpRelayMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<(), MailerError> {
        let client = self.client().await?;
        let message = RelayMessage::verification(&self.config.sender, email);
        let mut request = client
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .json(&message);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = map_status_error(status, &body);
            warn!(recipient = %email.to, status = status.as_u16(), "mail relay refused message");
            return Err(error);
        }
        info!(recipient = %email.to, "verification email handed to relay");
        Ok(())
    }
}

fn map_transport_error(error: reqwest::Error) -> MailerError {
    if error.is_timeout() {
        MailerError::timeout(error.to_string())
    } else {
        MailerError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> MailerError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MailerError::timeout(message),
        _ if status.is_client_error() => MailerError::rejected(message),
        _ => MailerError::transport(message),
    }
}
