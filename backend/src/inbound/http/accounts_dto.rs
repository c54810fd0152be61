//! Account request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{AuthenticatedSession, RegistrationReceipt};
use crate::domain::{Error, LoginCredentials, LoginValidationError, RegistrationForm, UserProfile};
use crate::inbound::http::validation::field_error;

/// Request body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ana")]
    pub name: String,
    /// `YYYY-MM-DD`.
    #[schema(example = "1990-06-15")]
    pub birth_date: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub password: String,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(value: RegisterRequest) -> Self {
        Self {
            display_name: value.name,
            birth_date: value.birth_date,
            email: value.email,
            password: Zeroizing::new(value.password),
        }
    }
}

/// Request body for `POST /api/v1/auth/register/resend`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResendRequest {
    pub email: String,
}

/// Request body for `POST /api/v1/auth/register/verify`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub email: String,
    #[schema(example = "482913")]
    pub code: String,
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(map_login_validation_error)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidEmail => {
            field_error("email", "invalid_email", err.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// Where the verification code went and when another may be requested.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceiptResponse {
    pub email: String,
    /// RFC 3339 timestamp of the last send.
    pub sent_at: String,
    /// RFC 3339 timestamp after which a resend is accepted.
    pub resend_available_at: String,
    pub resend_interval_secs: i64,
}

impl From<RegistrationReceipt> for RegistrationReceiptResponse {
    fn from(receipt: RegistrationReceipt) -> Self {
        Self {
            email: receipt.email.to_string(),
            sent_at: receipt.sent_at.to_rfc3339(),
            resend_available_at: receipt.resend_available_at.to_rfc3339(),
            resend_interval_secs: receipt.resend_interval_secs,
        }
    }
}

/// Profile of the signed-in user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub birth_date: String,
    /// Whole years, computed in UTC.
    pub age: u32,
    #[schema(example = "active")]
    pub status: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.get(),
            display_name: profile.display_name.to_string(),
            email: profile.email.to_string(),
            birth_date: profile.birth_date.to_string(),
            age: profile.age,
            status: profile.status.as_str().to_owned(),
        }
    }
}

/// Body returned when a session is opened.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: ProfileResponse,
    /// RFC 3339 expiry of the session token.
    pub expires_at: String,
}

impl From<&AuthenticatedSession> for SessionResponse {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            user: ProfileResponse::from(session.profile.clone()),
            expires_at: session.token.expires_at.to_rfc3339(),
        }
    }
}
