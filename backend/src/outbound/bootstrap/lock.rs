//! Exclusive file lock guarding one-time database bootstrap.
//!
//! The first instance to create the lock file wins; the others poll every
//! [`LOCK_RETRY_INTERVAL`] until the file disappears or the timeout elapses.
//! The file is removed when the guard drops. A crashed holder leaves the file
//! behind, so later starts fail loudly until an operator removes it.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::{debug, info, warn};

use super::BootstrapError;

/// Delay between attempts while another instance holds the lock.
pub const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Held bootstrap lock; released on drop.
#[derive(Debug)]
pub struct BootstrapLock {
    dir: Dir,
    file_name: PathBuf,
    path: PathBuf,
}

impl BootstrapLock {
    /// Acquire the lock at `path`, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::LockTimeout`] when another holder keeps the
    /// file past `timeout`, or [`BootstrapError::Lock`] for I/O failures.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, BootstrapError> {
        let (dir, file_name) = open_parent(path)?;
        let started = Instant::now();
        loop {
            match try_create(&dir, &file_name) {
                Ok(()) => {
                    info!(path = %path.display(), "bootstrap lock acquired");
                    return Ok(Self {
                        dir,
                        file_name,
                        path: path.to_path_buf(),
                    });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(BootstrapError::LockTimeout {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    debug!(path = %path.display(), "bootstrap lock busy; retrying");
                    tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
                }
                Err(source) => {
                    return Err(BootstrapError::Lock {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BootstrapLock {
    fn drop(&mut self) {
        match self.dir.remove_file(&self.file_name) {
            Ok(()) => info!(path = %self.path.display(), "bootstrap lock released"),
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove bootstrap lock"
            ),
        }
    }
}

fn open_parent(path: &Path) -> Result<(Dir, PathBuf), BootstrapError> {
    let lock_error = |source| BootstrapError::Lock {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path.file_name().map(PathBuf::from).ok_or_else(|| {
        lock_error(std::io::Error::new(
            ErrorKind::InvalidInput,
            "lock path must name a file",
        ))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(lock_error)?;
    Ok((dir, file_name))
}

fn try_create(dir: &Dir, file_name: &Path) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(file_name, &options)?;
    writeln!(file, "{}", std::process::id())
}
