//! Account holder data model.
//!
//! Users register with a display name, birth date, email, and password, then
//! activate the account with an emailed code. The pending code and its send
//! time travel together as one [`PendingVerification`] so they are always
//! present or absent as a pair.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::auth::PasswordHash;
use super::calendar::{CalendarDay, InvalidDate, age_on};
use super::verification::PendingVerification;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Storage identifiers are strictly positive.
    InvalidId,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Email exceeds the maximum length.
    EmailTooLong { max: usize },
    /// Display name was blank once trimmed.
    EmptyDisplayName,
    /// Display name exceeds the maximum length.
    DisplayNameTooLong { max: usize },
    /// Stored status string is not recognised.
    UnknownStatus { value: String },
    /// Active accounts cannot carry a pending code; pending ones must.
    InconsistentVerificationState,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@example.com"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::UnknownStatus { value } => write!(f, "unknown account status '{value}'"),
            Self::InconsistentVerificationState => write!(
                f,
                "pending accounts need a verification code and active accounts must not have one",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a storage identifier.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if value <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Raw identifier for persistence and token subjects.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Maximum accepted email length.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use sentinela::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ana@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ana@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 80;

/// Name shown in greetings and emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a display name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Lifecycle state of an account.
///
/// The only transition is `PendingVerification -> Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered; waiting for the emailed code.
    PendingVerification,
    /// Email confirmed; may sign in.
    Active,
}

impl AccountStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingVerification => "pending_verification",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_verification" => Ok(Self::PendingVerification),
            "active" => Ok(Self::Active),
            other => Err(UserValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Raw field bundle accepted by [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub display_name: DisplayName,
    pub birth_date: CalendarDay,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub status: AccountStatus,
    pub pending_verification: Option<PendingVerification>,
    pub created_at: DateTime<Utc>,
}

/// Registered account.
///
/// ## Invariants
/// - `status == Active` implies no pending verification.
/// - `status == PendingVerification` implies a pending verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    birth_date: CalendarDay,
    email: EmailAddress,
    password_hash: PasswordHash,
    status: AccountStatus,
    pending_verification: Option<PendingVerification>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a user after checking the status/verification pairing.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            display_name,
            birth_date,
            email,
            password_hash,
            status,
            pending_verification,
            created_at,
        } = draft;
        let consistent = match status {
            AccountStatus::Active => pending_verification.is_none(),
            AccountStatus::PendingVerification => pending_verification.is_some(),
        };
        if !consistent {
            return Err(UserValidationError::InconsistentVerificationState);
        }
        Ok(Self {
            id,
            display_name,
            birth_date,
            email,
            password_hash,
            status,
            pending_verification,
            created_at,
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn birth_date(&self) -> CalendarDay {
        self.birth_date
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Outstanding verification, present only while pending.
    pub fn pending_verification(&self) -> Option<&PendingVerification> {
        self.pending_verification.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the account has completed email verification.
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Age in whole years on `today`.
    pub fn age_on(&self, today: CalendarDay) -> Result<u32, InvalidDate> {
        age_on(self.birth_date, today)
    }

    /// Public projection with the computed age.
    pub fn profile(&self, today: CalendarDay) -> Result<UserProfile, InvalidDate> {
        Ok(UserProfile {
            id: self.id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            birth_date: self.birth_date,
            age: self.age_on(today)?,
            status: self.status,
        })
    }
}

/// Registration draft handed to the user repository.
///
/// New users always start in [`AccountStatus::PendingVerification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub display_name: DisplayName,
    pub birth_date: CalendarDay,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub verification: PendingVerification,
}

/// Profile returned to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: DisplayName,
    pub email: EmailAddress,
    pub birth_date: CalendarDay,
    pub age: u32,
    pub status: AccountStatus,
}
