//! Account domain service: registration, code resend, verification, login,
//! and profile lookup.
//!
//! Failures are first described precisely by [`AccountError`] and logged
//! with that detail. [`AccountError::into_public`] then collapses them into
//! the externally visible [`Error`], merging outcomes that would otherwise
//! reveal whether an account exists.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AuthenticatedSession, MailerError, PasswordHasher, PasswordHasherError,
    RegistrationReceipt, SessionIdentity, SessionTokenCodec, SessionTokenError,
    UserPersistenceError, UserProfileQuery, UserRepository, VerificationEmail,
    VerificationMailer, VerifyAccountRequest,
};
use crate::domain::{
    CalendarDay, EmailAddress, Error, InvalidDate, LoginCredentials, NewUser,
    PendingVerification, Registration, RegistrationForm, RegistrationValidationError,
    ResendTooSoon, User, UserId, UserProfile, VerificationCode, VerificationPolicy,
};

/// Why a verification attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationRejection {
    NoPendingAccount,
    CodeMismatch,
    MalformedCode,
}

/// Why a sign-in attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    UnknownEmail,
    WrongPassword,
}

/// Fully informative account failure, never returned to clients as-is.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("registration rejected: {0}")]
    Validation(RegistrationValidationError),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("no pending account for resend")]
    NoPendingAccount,
    #[error("verification rejected: {0:?}")]
    VerificationRejected(VerificationRejection),
    #[error("login rejected: {0:?}")]
    LoginRejected(LoginRejection),
    #[error("account has not been verified")]
    NotVerified,
    #[error("resend requested inside cooldown")]
    ResendTooSoon {
        pending: ResendTooSoon,
        now: DateTime<Utc>,
    },
    #[error(transparent)]
    MailDelivery(MailerError),
    #[error(transparent)]
    Repository(UserPersistenceError),
    #[error(transparent)]
    Hashing(PasswordHasherError),
    #[error(transparent)]
    Token(SessionTokenError),
    #[error("stored account data is inconsistent: {0}")]
    Corrupt(InvalidDate),
    #[error("session user no longer exists")]
    UnknownSessionUser,
}

impl AccountError {
    /// Stable reason label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateEmail => "duplicate_email",
            Self::NoPendingAccount => "no_pending_account",
            Self::VerificationRejected(VerificationRejection::NoPendingAccount) => {
                "verify_no_pending_account"
            }
            Self::VerificationRejected(VerificationRejection::CodeMismatch) => "code_mismatch",
            Self::VerificationRejected(VerificationRejection::MalformedCode) => "malformed_code",
            Self::LoginRejected(LoginRejection::UnknownEmail) => "unknown_email",
            Self::LoginRejected(LoginRejection::WrongPassword) => "wrong_password",
            Self::NotVerified => "not_verified",
            Self::ResendTooSoon { .. } => "resend_too_soon",
            Self::MailDelivery(_) => "mail_delivery_failed",
            Self::Repository(_) => "repository",
            Self::Hashing(_) => "hashing",
            Self::Token(_) => "token",
            Self::Corrupt(_) => "corrupt_record",
            Self::UnknownSessionUser => "unknown_session_user",
        }
    }

    /// Log the precise failure and return the public error.
    pub fn into_public(self) -> Error {
        match &self {
            Self::Repository(_)
            | Self::Hashing(_)
            | Self::Token(_)
            | Self::Corrupt(_)
            | Self::MailDelivery(_) => {
                warn!(reason = self.reason(), error = %self, "account operation failed");
            }
            _ => info!(reason = self.reason(), "account request refused"),
        }
        match self {
            Self::Validation(err) => Error::invalid_request(err.to_string()).with_details(json!({
                "field": err.field(),
                "code": err.code(),
            })),
            Self::DuplicateEmail => Error::conflict("an account with this email already exists"),
            Self::NoPendingAccount => {
                Error::not_found("no account is awaiting verification for this email")
            }
            Self::VerificationRejected(_) => {
                Error::invalid_request("invalid or expired verification code")
            }
            Self::LoginRejected(_) => Error::unauthorized("invalid email or password"),
            Self::NotVerified => Error::forbidden("verify your email before signing in"),
            Self::ResendTooSoon { pending, now } => {
                Error::too_many_requests("please wait before requesting another code")
                    .with_details(json!({
                        "resendAvailableAt": pending.available_at,
                        "retryAfterSecs": pending.retry_after_secs(now),
                    }))
            }
            Self::MailDelivery(_) => Error::service_unavailable(
                "could not send the verification email; request a new code",
            ),
            Self::Repository(UserPersistenceError::Connection { message }) => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            Self::Repository(UserPersistenceError::DuplicateEmail { .. }) => {
                Error::conflict("an account with this email already exists")
            }
            Self::Repository(UserPersistenceError::Query { message }) => {
                Error::internal(format!("user repository error: {message}"))
            }
            Self::Hashing(err) => Error::internal(err.to_string()),
            Self::Token(err) => Error::internal(err.to_string()),
            Self::Corrupt(err) => Error::internal(format!("inconsistent account record: {err}")),
            Self::UnknownSessionUser => Error::unauthorized("session is no longer valid"),
        }
    }
}

impl From<UserPersistenceError> for AccountError {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateEmail { .. } => Self::DuplicateEmail,
            other => Self::Repository(other),
        }
    }
}

/// Collaborators of [`AccountService`].
pub struct AccountServiceDeps<U, H, M, T> {
    pub users: Arc<U>,
    pub hasher: Arc<H>,
    pub mailer: Arc<M>,
    pub tokens: Arc<T>,
    pub clock: Arc<dyn Clock>,
    pub policy: VerificationPolicy,
}

/// Account service implementing [`AccountCommand`] and [`UserProfileQuery`].
pub struct AccountService<U, H, M, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    mailer: Arc<M>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    policy: VerificationPolicy,
}

impl<U, H, M, T> Clone for AccountService<U, H, M, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            mailer: Arc::clone(&self.mailer),
            tokens: Arc::clone(&self.tokens),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<U, H, M, T> AccountService<U, H, M, T> {
    pub fn new(deps: AccountServiceDeps<U, H, M, T>) -> Self {
        let AccountServiceDeps {
            users,
            hasher,
            mailer,
            tokens,
            clock,
            policy,
        } = deps;
        Self {
            users,
            hasher,
            mailer,
            tokens,
            clock,
            policy,
        }
    }

    fn receipt(&self, email: EmailAddress, sent_at: DateTime<Utc>) -> RegistrationReceipt {
        RegistrationReceipt {
            email,
            sent_at,
            resend_available_at: self.policy.resend_available_at(sent_at),
            resend_interval_secs: self.policy.cooldown().num_seconds(),
        }
    }

    fn issue_pending(&self, now: DateTime<Utc>) -> PendingVerification {
        self.policy.issue(&mut rand::thread_rng(), now)
    }
}

impl<U, H, M, T> AccountService<U, H, M, T>
where
    U: UserRepository,
    H: PasswordHasher,
    M: VerificationMailer,
    T: SessionTokenCodec,
{
    /// Send the code; on failure rewind the send time so the user can ask
    /// for a new code straight away.
    async fn deliver(
        &self,
        user: &User,
        pending: &PendingVerification,
    ) -> Result<(), AccountError> {
        let email = VerificationEmail {
            to: user.email().clone(),
            display_name: user.display_name().clone(),
            code: pending.code.clone(),
        };
        let Err(mail_error) = self.mailer.send(&email).await else {
            return Ok(());
        };
        let rewound = PendingVerification {
            code: pending.code.clone(),
            sent_at: self.policy.rewound_sent_at(self.clock.utc()),
        };
        if let Err(err) = self.users.refresh_verification(user.id(), &rewound).await {
            warn!(user_id = %user.id(), error = %err, "failed to clear resend cooldown");
        }
        Err(AccountError::MailDelivery(mail_error))
    }

    fn open_session(&self, user: &User) -> Result<AuthenticatedSession, AccountError> {
        let today = CalendarDay::today(self.clock.as_ref());
        let profile = user.profile(today).map_err(AccountError::Corrupt)?;
        let token = self
            .tokens
            .issue(&SessionIdentity {
                user_id: user.id(),
                email: user.email().clone(),
                display_name: user.display_name().clone(),
            })
            .map_err(AccountError::Token)?;
        Ok(AuthenticatedSession { profile, token })
    }

    async fn try_register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationReceipt, AccountError> {
        let now = self.clock.utc();
        let today = CalendarDay::from_timestamp(now);
        let registration =
            Registration::try_from_parts(form.parts(), today).map_err(AccountError::Validation)?;

        if self.users.find_by_email(registration.email()).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(AccountError::Hashing)?;
        let pending = self.issue_pending(now);
        let user = self
            .users
            .create(&NewUser {
                display_name: registration.display_name().clone(),
                birth_date: registration.birth_date(),
                email: registration.email().clone(),
                password_hash,
                verification: pending.clone(),
            })
            .await?;
        info!(user_id = %user.id(), "account registered; awaiting verification");

        self.deliver(&user, &pending).await?;
        Ok(self.receipt(user.email().clone(), pending.sent_at))
    }

    async fn try_resend(&self, email: &EmailAddress) -> Result<RegistrationReceipt, AccountError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AccountError::NoPendingAccount)?;
        let last_sent_at = user
            .pending_verification()
            .map(|pending| pending.sent_at)
            .ok_or(AccountError::NoPendingAccount)?;

        let now = self.clock.utc();
        self.policy
            .check_resend(Some(last_sent_at), now)
            .map_err(|pending| AccountError::ResendTooSoon { pending, now })?;

        let pending = self.issue_pending(now);
        if !self.users.refresh_verification(user.id(), &pending).await? {
            return Err(AccountError::NoPendingAccount);
        }
        info!(user_id = %user.id(), "verification code reissued");

        self.deliver(&user, &pending).await?;
        Ok(self.receipt(user.email().clone(), pending.sent_at))
    }

    async fn try_verify(
        &self,
        request: VerifyAccountRequest,
    ) -> Result<AuthenticatedSession, AccountError> {
        let candidate = VerificationCode::parse(&request.code).map_err(|_| {
            AccountError::VerificationRejected(VerificationRejection::MalformedCode)
        })?;
        let no_pending =
            || AccountError::VerificationRejected(VerificationRejection::NoPendingAccount);

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(no_pending)?;
        let pending = user.pending_verification().ok_or_else(no_pending)?;
        if !pending.code.matches(&candidate) {
            return Err(AccountError::VerificationRejected(
                VerificationRejection::CodeMismatch,
            ));
        }

        let active = self
            .users
            .activate(user.id())
            .await?
            .ok_or_else(no_pending)?;
        info!(user_id = %active.id(), "account verified");
        self.open_session(&active)
    }

    async fn try_login(
        &self,
        credentials: LoginCredentials,
    ) -> Result<AuthenticatedSession, AccountError> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await?
            .ok_or(AccountError::LoginRejected(LoginRejection::UnknownEmail))?;
        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(AccountError::Hashing)?;
        if !matches {
            return Err(AccountError::LoginRejected(LoginRejection::WrongPassword));
        }
        if !user.is_active() {
            return Err(AccountError::NotVerified);
        }
        info!(user_id = %user.id(), "user signed in");
        self.open_session(&user)
    }

    async fn try_fetch_profile(&self, user_id: UserId) -> Result<UserProfile, AccountError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UnknownSessionUser)?;
        user.profile(CalendarDay::today(self.clock.as_ref()))
            .map_err(AccountError::Corrupt)
    }
}

#[async_trait]
impl<U, H, M, T> AccountCommand for AccountService<U, H, M, T>
where
    U: UserRepository,
    H: PasswordHasher,
    M: VerificationMailer,
    T: SessionTokenCodec,
{
    async fn register(&self, form: RegistrationForm) -> Result<RegistrationReceipt, Error> {
        self.try_register(form)
            .await
            .map_err(AccountError::into_public)
    }

    async fn resend_code(&self, email: &EmailAddress) -> Result<RegistrationReceipt, Error> {
        self.try_resend(email)
            .await
            .map_err(AccountError::into_public)
    }

    async fn verify(&self, request: VerifyAccountRequest) -> Result<AuthenticatedSession, Error> {
        self.try_verify(request)
            .await
            .map_err(AccountError::into_public)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error> {
        self.try_login(credentials)
            .await
            .map_err(AccountError::into_public)
    }
}

#[async_trait]
impl<U, H, M, T> UserProfileQuery for AccountService<U, H, M, T>
where
    U: UserRepository,
    H: PasswordHasher,
    M: VerificationMailer,
    T: SessionTokenCodec,
{
    async fn fetch_profile(&self, user_id: UserId) -> Result<UserProfile, Error> {
        self.try_fetch_profile(user_id)
            .await
            .map_err(AccountError::into_public)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
