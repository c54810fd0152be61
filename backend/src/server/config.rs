//! Application settings loaded via OrthoConfig and the server configuration
//! object built from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use sentinela::domain::{DemoAccount, DisplayName, EmailAddress};
use sentinela::inbound::http::session_config::SessionSettings;
use sentinela::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOCK_PATH: &str = "/tmp/sentinela-bootstrap.lock";
const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAIL_SENDER: &str = "Sentinela <no-reply@sentinela.local>";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEMO_EMAIL: &str = "demo@sentinela.local";
const DEFAULT_DEMO_NAME: &str = "Demo";

/// Process settings. Every field can come from a `SENTINELA_*` environment
/// variable, a configuration file, or the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SENTINELA")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Lock file guarding migrations and seeding.
    pub bootstrap_lock_path: Option<PathBuf>,
    pub bootstrap_lock_timeout_secs: Option<u64>,
    /// Mail relay endpoint; codes are only logged when unset.
    pub mail_relay_url: Option<String>,
    pub mail_relay_token: Option<String>,
    pub mail_sender: Option<String>,
    pub mail_timeout_secs: Option<u64>,
    /// Seed a demo account with sample check-ins at startup.
    #[ortho_config(default = false)]
    pub seed_demo_account: bool,
    pub demo_email: Option<String>,
    pub demo_name: Option<String>,
    pub demo_password: Option<String>,
}

/// Settings that cannot be used as given.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("SENTINELA_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("invalid demo account {field}: {message}")]
    InvalidDemoAccount { field: &'static str, message: String },
    #[error("SENTINELA_DEMO_PASSWORD must be set when demo seeding is enabled")]
    MissingDemoPassword,
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn bootstrap_lock_path(&self) -> PathBuf {
        self.bootstrap_lock_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCK_PATH))
    }

    pub fn bootstrap_lock_timeout(&self) -> Duration {
        Duration::from_secs(
            self.bootstrap_lock_timeout_secs
                .unwrap_or(DEFAULT_LOCK_TIMEOUT_SECS),
        )
    }

    pub fn mail_sender(&self) -> &str {
        self.mail_sender.as_deref().unwrap_or(DEFAULT_MAIL_SENDER)
    }

    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs.unwrap_or(DEFAULT_MAIL_TIMEOUT_SECS))
    }

    pub fn mail_relay_token(&self) -> Option<Zeroizing<String>> {
        self.mail_relay_token.clone().map(Zeroizing::new)
    }

    /// Demo account to seed, or `None` when seeding is disabled.
    pub fn demo_account(&self) -> Result<Option<DemoAccount>, SettingsError> {
        if !self.seed_demo_account {
            return Ok(None);
        }
        let email = EmailAddress::new(self.demo_email.as_deref().unwrap_or(DEFAULT_DEMO_EMAIL))
            .map_err(|err| SettingsError::InvalidDemoAccount {
                field: "email",
                message: err.to_string(),
            })?;
        let display_name = DisplayName::new(self.demo_name.as_deref().unwrap_or(DEFAULT_DEMO_NAME))
            .map_err(|err| SettingsError::InvalidDemoAccount {
                field: "name",
                message: err.to_string(),
            })?;
        let password = self
            .demo_password
            .clone()
            .filter(|password| !password.is_empty())
            .ok_or(SettingsError::MissingDemoPassword)?;
        Ok(Some(DemoAccount {
            email,
            display_name,
            password: Zeroizing::new(password),
        }))
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session: SessionSettings,
    pub(crate) db_pool: DbPool,
    pub(crate) settings: AppSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        session: SessionSettings,
        db_pool: DbPool,
        settings: AppSettings,
    ) -> Self {
        Self {
            bind_addr,
            session,
            db_pool,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "SENTINELA_DATABASE_URL",
        "SENTINELA_BIND_ADDR",
        "SENTINELA_SEED_DEMO_ACCOUNT",
        "SENTINELA_DEMO_EMAIL",
        "SENTINELA_DEMO_PASSWORD",
        "SENTINELA_MAIL_TIMEOUT_SECS",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("sentinela")]).expect("config should load")
    }

    /// Every known variable, unset unless named in `overrides`.
    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert_eq!(
            settings.bind_addr().expect("default bind addr").to_string(),
            DEFAULT_BIND_ADDR
        );
        assert_eq!(settings.mail_timeout(), Duration::from_secs(10));
        assert!(settings.demo_account().expect("disabled").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("SENTINELA_DATABASE_URL", "postgres://localhost/sentinela"),
            ("SENTINELA_BIND_ADDR", "127.0.0.1:9000"),
            ("SENTINELA_MAIL_TIMEOUT_SECS", "3"),
        ]));

        let settings = load();
        assert_eq!(
            settings.database_url().expect("url"),
            "postgres://localhost/sentinela"
        );
        assert_eq!(
            settings.bind_addr().expect("bind addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(settings.mail_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    fn demo_seeding_requires_a_password() {
        let _guard = lock_env(env_with(&[("SENTINELA_SEED_DEMO_ACCOUNT", "true")]));

        assert!(matches!(
            load().demo_account(),
            Err(SettingsError::MissingDemoPassword)
        ));
    }

    #[rstest]
    fn demo_account_uses_defaults() {
        let _guard = lock_env(env_with(&[
            ("SENTINELA_SEED_DEMO_ACCOUNT", "true"),
            ("SENTINELA_DEMO_PASSWORD", "demo-password"),
        ]));

        let account = load()
            .demo_account()
            .expect("valid demo settings")
            .expect("enabled");
        assert_eq!(account.email.as_ref(), DEFAULT_DEMO_EMAIL);
        assert_eq!(account.display_name.to_string(), DEFAULT_DEMO_NAME);
    }
}
