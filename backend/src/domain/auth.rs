//! Authentication primitives: login credentials, registration input, and
//! stored password hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::calendar::{CalendarDay, age_on};
use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum age, in whole years, required to register.
pub const MINIMUM_AGE: u32 = 18;
/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must look like name@example.com"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and lower-cased.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use sentinela::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ana@Example.com", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "ana@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration form is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    InvalidDisplayName(UserValidationError),
    InvalidEmail(UserValidationError),
    InvalidBirthDate,
    Underage { min_age: u32 },
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidDisplayName(_) => "name",
            Self::InvalidEmail(_) => "email",
            Self::InvalidBirthDate | Self::Underage { .. } => "birthDate",
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDisplayName(_) => "invalid_name",
            Self::InvalidEmail(_) => "invalid_email",
            Self::InvalidBirthDate => "invalid_birth_date",
            Self::Underage { .. } => "underage",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDisplayName(err) | Self::InvalidEmail(err) => err.fmt(f),
            Self::InvalidBirthDate => write!(f, "birth date must be a past YYYY-MM-DD date"),
            Self::Underage { min_age } => write!(f, "you must be at least {min_age} to register"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Raw registration form fields.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationParts<'a> {
    pub display_name: &'a str,
    pub birth_date: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Owned registration form as received from a client.
///
/// Validation needs "today" for the age rule, so it runs inside the account
/// service against the injected clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub display_name: String,
    pub birth_date: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl RegistrationForm {
    pub fn parts(&self) -> RegistrationParts<'_> {
        RegistrationParts {
            display_name: &self.display_name,
            birth_date: &self.birth_date,
            email: &self.email,
            password: self.password.as_str(),
        }
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    display_name: DisplayName,
    birth_date: CalendarDay,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate form fields against `today` for the age check.
    pub fn try_from_parts(
        parts: RegistrationParts<'_>,
        today: CalendarDay,
    ) -> Result<Self, RegistrationValidationError> {
        let display_name = DisplayName::new(parts.display_name)
            .map_err(RegistrationValidationError::InvalidDisplayName)?;
        let birth_date = CalendarDay::parse_iso(parts.birth_date.trim())
            .map_err(|_| RegistrationValidationError::InvalidBirthDate)?;
        let age =
            age_on(birth_date, today).map_err(|_| RegistrationValidationError::InvalidBirthDate)?;
        if age < MINIMUM_AGE {
            return Err(RegistrationValidationError::Underage {
                min_age: MINIMUM_AGE,
            });
        }
        let email =
            EmailAddress::new(parts.email).map_err(RegistrationValidationError::InvalidEmail)?;
        if parts.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self {
            display_name,
            birth_date,
            email,
            password: Zeroizing::new(parts.password.to_owned()),
        })
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

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Encoded password hash (PHC string format).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
