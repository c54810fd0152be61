//! Builders for HTTP state ports and the readiness probe.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::Url;
use tracing::info;

use sentinela::domain::{
    AccountService, AccountServiceDeps, CheckInService, DashboardService, VerificationPolicy,
};
use sentinela::inbound::http::health::DependencyProbe;
use sentinela::inbound::http::state::{HttpState, HttpStatePorts};
use sentinela::outbound::mail::{HttpRelayConfig, HttpRelayMailer, LogMailer, MailTransport};
use sentinela::outbound::persistence::{DbPool, DieselCheckInRepository, DieselUserRepository};
use sentinela::outbound::security::{Argon2PasswordHasher, JwtSessionCodec};

use super::ServerConfig;
use super::config::AppSettings;

/// Errors raised while assembling the HTTP state.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error("invalid mail relay URL {value}: {message}")]
    MailRelayUrl { value: String, message: String },
    #[error("password hasher configuration rejected: {0}")]
    Hasher(String),
}

impl From<StateBuildError> for std::io::Error {
    fn from(value: StateBuildError) -> Self {
        std::io::Error::other(value.to_string())
    }
}

/// Pick the relay transport when a URL is configured, else log codes.
pub(crate) fn build_mail_transport(
    settings: &AppSettings,
) -> Result<MailTransport, StateBuildError> {
    let Some(raw) = settings.mail_relay_url.as_deref() else {
        return Ok(MailTransport::Log(LogMailer));
    };
    let endpoint = Url::parse(raw).map_err(|err| StateBuildError::MailRelayUrl {
        value: raw.to_owned(),
        message: err.to_string(),
    })?;
    Ok(MailTransport::Relay(HttpRelayMailer::new(HttpRelayConfig {
        endpoint,
        token: settings.mail_relay_token(),
        sender: settings.mail_sender().to_owned(),
        timeout: settings.mail_timeout(),
    })))
}

/// Wire repositories, services, and the session codec into [`HttpState`].
///
/// The signing secret is copied into the codec keys and wiped with the
/// settings when `config` drops.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, StateBuildError> {
    let pool = config.db_pool.clone();
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let check_in_repo = Arc::new(DieselCheckInRepository::new(pool));
    let hasher =
        Argon2PasswordHasher::new().map_err(|err| StateBuildError::Hasher(err.to_string()))?;
    let tokens = Arc::new(JwtSessionCodec::new(
        config.session.secret.as_slice(),
        config.session.ttl,
        Arc::clone(&clock),
    ));
    let mailer = build_mail_transport(&config.settings)?;
    info!(transport = mailer.kind(), "verification mail transport configured");

    let accounts = Arc::new(AccountService::new(AccountServiceDeps {
        users,
        hasher: Arc::new(hasher),
        mailer: Arc::new(mailer),
        tokens: Arc::clone(&tokens),
        clock: Arc::clone(&clock),
        policy: VerificationPolicy::default(),
    }));
    let check_ins = Arc::new(CheckInService::new(
        Arc::clone(&check_in_repo),
        Arc::clone(&clock),
    ));
    let dashboard = Arc::new(DashboardService::new(check_in_repo, clock));

    Ok(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            profile: accounts,
            check_ins: check_ins.clone(),
            check_ins_query: check_ins,
            dashboard,
            sessions: tokens,
        },
        config.session.cookie,
    ))
}

/// Readiness probe that round-trips a query through the pool.
pub(crate) struct DatabaseProbe {
    pool: DbPool,
}

impl DatabaseProbe {
    pub(crate) fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependencyProbe for DatabaseProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.pool.ping().await.map_err(|err| err.to_string())
    }
}
