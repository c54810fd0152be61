//! Backend entry-point: loads settings, bootstraps the database, and serves
//! the REST API.

mod server;

use std::sync::Arc;

use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sentinela::inbound::http::health::HealthState;
use sentinela::inbound::http::session_config::{
    BuildMode, fingerprint::secret_fingerprint, session_settings_from_env,
};
use sentinela::outbound::bootstrap::{BootstrapSettings, bootstrap_database};
use sentinela::outbound::persistence::{DbPool, PoolConfig};

use server::{AppSettings, ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| startup_error("load settings", err))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("session settings", err))?;
    info!(
        fingerprint = %secret_fingerprint(&session.secret),
        cookie_secure = session.cookie.secure,
        ttl_secs = session.ttl.num_seconds(),
        "session signing secret loaded"
    );

    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("configuration", err))?
        .to_owned();
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("configuration", err))?;
    let demo_account = settings
        .demo_account()
        .map_err(|err| startup_error("configuration", err))?;

    let pool = DbPool::new(PoolConfig::new(database_url.clone()))
        .await
        .map_err(|err| startup_error("database pool", err))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    bootstrap_database(
        BootstrapSettings {
            lock_path: settings.bootstrap_lock_path(),
            lock_timeout: settings.bootstrap_lock_timeout(),
            database_url,
            demo_account,
        },
        &pool,
        Arc::clone(&clock),
    )
    .await
    .map_err(|err| startup_error("database bootstrap", err))?;

    let config = ServerConfig::new(bind_addr, session, pool, settings);
    let server = create_server(HealthState::new(), config, clock)?;
    info!(%bind_addr, "listening");
    server.await
}
