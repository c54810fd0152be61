//! Environment parsing helpers for session configuration.
//!
//! Debug builds fall back to a default and log a warning; release builds
//! reject a missing or malformed toggle.

use actix_web::cookie::SameSite;
use chrono::TimeDelta;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, DEFAULT_SESSION_TTL_SECS, SAMESITE_ENV, SessionConfigError, TTL_ENV};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "a positive number of seconds";

/// A boolean toggle and the value assumed in debug builds when it is unusable.
pub(super) struct BoolEnvConfig {
    name: &'static str,
    default_value: bool,
}

impl BoolEnvConfig {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }

    fn default_label(&self) -> &'static str {
        if self.default_value {
            "enabled"
        } else {
            "disabled"
        }
    }
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SessionConfigError {
    SessionConfigError::InvalidEnv {
        name,
        value: value.to_owned(),
        expected,
    }
}

/// Read a boolean toggle; `check` may still veto a parsed value for `mode`.
pub(super) fn parse_bool_env<E: Env, F>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
    check: F,
) -> Result<bool, SessionConfigError>
where
    F: FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
{
    let label = config.default_label();
    let Some(raw) = env.string(config.name) else {
        return debug_warn_or_error(
            mode,
            config.default_value,
            SessionConfigError::MissingEnv { name: config.name },
            || warn!("{} not set; defaulting to {label}", config.name),
        );
    };

    if let Some(flag) = parse_bool(&raw) {
        return check(flag, mode);
    }
    debug_warn_or_error(
        mode,
        config.default_value,
        invalid(config.name, &raw, BOOL_EXPECTED),
        || warn!(value = %raw, "invalid {}; defaulting to {label}", config.name),
    )
}

/// Fall back with a warning in debug builds; fail in release builds.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if !mode.is_debug() {
        return Err(error);
    }
    warn_fn();
    Ok(fallback)
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    let parsed = match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    };

    match parsed {
        Some(SameSite::None) if !cookie_secure => debug_warn_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || {
                warn!(
                    "SESSION_SAMESITE=None without a secure cookie; \
                     browsers may drop the session cookie"
                );
            },
        ),
        Some(same_site) => Ok(same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            invalid(SAMESITE_ENV, &value, SAMESITE_EXPECTED),
            || warn!(value = %value, "invalid SESSION_SAMESITE; using default"),
        ),
    }
}

/// Session lifetime from `SESSION_TTL_SECS`, defaulting to seven days.
///
/// Zero and negative lifetimes are malformed.
pub(super) fn parse_ttl_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TimeDelta, SessionConfigError> {
    let default_ttl = TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS);
    let Some(raw) = env.string(TTL_ENV) else {
        return Ok(default_ttl);
    };
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(TimeDelta::seconds(secs)),
        _ => debug_warn_or_error(mode, default_ttl, invalid(TTL_ENV, &raw, TTL_EXPECTED), || {
            warn!(value = %raw, "invalid SESSION_TTL_SECS; using default");
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
