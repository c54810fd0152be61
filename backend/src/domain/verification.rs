//! Email verification codes and the resend cooldown.
//!
//! A code is six ASCII digits drawn uniformly from `000000..=999999`. Codes
//! may be resent once the cooldown since the previous send has elapsed.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Number of digits in a verification code.
pub const VERIFICATION_CODE_LEN: usize = 6;
/// Minimum delay between two code emails for the same account, in seconds.
pub const VERIFICATION_RESEND_COOLDOWN_SECS: i64 = 120;

const CODE_SPACE: u32 = 1_000_000;

/// Rejection raised when user input is not a six-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("verification code must be exactly {VERIFICATION_CODE_LEN} digits")]
pub struct InvalidVerificationCode;

/// Six-digit numeric verification code.
///
/// # Examples
/// ```
/// use sentinela::domain::VerificationCode;
///
/// let code = VerificationCode::parse(" 004217 ").expect("six digits");
/// assert_eq!(code.as_str(), "004217");
/// assert!(VerificationCode::parse("4217").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Draw a fresh code, left-padded with zeros.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value = rng.gen_range(0..CODE_SPACE);
        Self(format!("{value:06}"))
    }

    /// Validate caller input, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, InvalidVerificationCode> {
        let trimmed = raw.trim();
        if trimmed.len() != VERIFICATION_CODE_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(InvalidVerificationCode);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare without short-circuiting on the first differing digit.
    pub fn matches(&self, candidate: &Self) -> bool {
        let (left, right) = (self.0.as_bytes(), candidate.0.as_bytes());
        left.len() == right.len()
            && left
                .iter()
                .zip(right)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

/// Outstanding code plus the moment it was emailed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub code: VerificationCode,
    pub sent_at: DateTime<Utc>,
}

/// Raised when a resend is requested inside the cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("verification code was sent recently; retry after {available_at}")]
pub struct ResendTooSoon {
    pub available_at: DateTime<Utc>,
}

impl ResendTooSoon {
    /// Whole seconds until a resend is allowed, rounded up.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.available_at - now;
        let secs = remaining.num_seconds();
        let partial = remaining - Duration::seconds(secs) > Duration::zero();
        (secs + i64::from(partial)).max(0)
    }
}

/// Issuing and resend rules for verification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    cooldown: Duration,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::seconds(VERIFICATION_RESEND_COOLDOWN_SECS),
        }
    }
}

impl VerificationPolicy {
    /// Policy with a custom cooldown.
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Fresh pending verification sent at `now`.
    pub fn issue<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> PendingVerification {
        PendingVerification {
            code: VerificationCode::generate(rng),
            sent_at: now,
        }
    }

    /// Earliest moment another code may be sent.
    pub fn resend_available_at(&self, last_sent_at: DateTime<Utc>) -> DateTime<Utc> {
        last_sent_at + self.cooldown
    }

    /// True when nothing was sent yet or the cooldown has fully elapsed.
    pub fn can_resend(&self, last_sent_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        last_sent_at.is_none_or(|sent| now - sent >= self.cooldown)
    }

    pub fn check_resend(
        &self,
        last_sent_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), ResendTooSoon> {
        match last_sent_at {
            Some(sent) if !self.can_resend(Some(sent), now) => Err(ResendTooSoon {
                available_at: self.resend_available_at(sent),
            }),
            _ => Ok(()),
        }
    }

    /// Send time recorded after a failed delivery so a resend is allowed
    /// straight away.
    pub fn rewound_sent_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.cooldown
    }
}
