//! One-time database bootstrap run at process start.
//!
//! Migrations and the optional demo seed run while holding
//! [`BootstrapLock`], so several instances starting together apply them
//! exactly once. Request handling never takes this lock.

mod lock;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

pub use lock::{BootstrapLock, LOCK_RETRY_INTERVAL};

use crate::domain::{DemoAccount, DemoAccountSeeder, DemoSeedError, DemoSeedOutcome};
use crate::outbound::persistence::{
    DbPool, DieselCheckInRepository, DieselUserRepository, MigrationError,
    run_pending_migrations,
};
use crate::outbound::security::Argon2PasswordHasher;

/// Errors raised during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("bootstrap lock {path} unavailable: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {waited:?} waiting for bootstrap lock {path}")]
    LockTimeout { path: PathBuf, waited: Duration },
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("demo account seeding failed: {0}")]
    Seed(#[from] DemoSeedError),
}

/// Inputs for [`bootstrap_database`].
pub struct BootstrapSettings {
    pub lock_path: PathBuf,
    pub lock_timeout: Duration,
    pub database_url: String,
    /// Demo account to seed, if enabled.
    pub demo_account: Option<DemoAccount>,
}

/// Run `work` while holding the bootstrap lock at `lock_path`.
///
/// # Errors
///
/// Returns lock failures, or whatever `work` returns.
pub async fn with_bootstrap_lock<T, F, Fut>(
    lock_path: &Path,
    timeout: Duration,
    work: F,
) -> Result<T, BootstrapError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, BootstrapError>>,
{
    let _lock = BootstrapLock::acquire(lock_path, timeout).await?;
    work().await
}

/// Apply migrations and seed the demo account under the bootstrap lock.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the lock, a migration, or seeding fails.
pub async fn bootstrap_database(
    settings: BootstrapSettings,
    pool: &DbPool,
    clock: Arc<dyn Clock>,
) -> Result<Option<DemoSeedOutcome>, BootstrapError> {
    let BootstrapSettings {
        lock_path,
        lock_timeout,
        database_url,
        demo_account,
    } = settings;

    with_bootstrap_lock(&lock_path, lock_timeout, || async move {
        let applied = run_pending_migrations(&database_url).await?;
        info!(applied, "database migrations complete");

        let Some(account) = demo_account else {
            info!(reason = "disabled", "demo account seeding skipped");
            return Ok(None);
        };
        let hasher = Argon2PasswordHasher::new()
            .map_err(|err| BootstrapError::Seed(DemoSeedError::Hashing(err)))?;
        let seeder = DemoAccountSeeder::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselCheckInRepository::new(pool.clone())),
            Arc::new(hasher),
            clock,
        );
        let outcome = seeder.seed(&account).await?;
        match outcome {
            DemoSeedOutcome::Created { user_id, check_ins } => {
                info!(%user_id, check_ins, "demo account seeded");
            }
            DemoSeedOutcome::AlreadyPresent => info!("demo account already present"),
        }
        Ok(Some(outcome))
    })
    .await
}
