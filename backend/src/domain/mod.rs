//! Domain primitives, policies, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - CalendarDay: UTC day normalisation used by every date rule.
//! - User, Registration, LoginCredentials: account model and input.
//! - VerificationCode, VerificationPolicy: emailed activation codes.
//! - CheckIn, SubmissionWindow: daily check-ins and the backdating window.
//! - dashboard aggregation: averages, streak, trend series, alerts.
//! - AccountService, CheckInService, DashboardService: driving port
//!   implementations.
//! - DemoAccountSeeder: optional sample account for fresh deployments.

pub mod account_service;
pub mod auth;
pub mod calendar;
pub mod check_in;
pub mod check_in_service;
pub mod dashboard;
pub mod dashboard_service;
pub mod demo_account;
pub mod error;
pub mod ports;
#[cfg(test)]
pub(crate) mod service_test_helpers;
pub mod trace_id;
pub mod user;
pub mod verification;

pub use self::account_service::{AccountService, AccountServiceDeps};
pub use self::auth::{
    LoginCredentials, LoginValidationError, MINIMUM_AGE, PASSWORD_MIN_LEN, PasswordHash,
    Registration, RegistrationForm, RegistrationParts, RegistrationValidationError,
};
pub use self::calendar::{CalendarDay, DayBounds, DayWindow, InvalidDate, age_on};
pub use self::check_in::{
    CheckIn, CheckInDraft, CheckInId, CheckInNotes, CheckInScores, CheckInValidationError,
    Metric, NOTES_MAX, NoteSections, RawScores, SCORE_MAX, SCORE_MIN, SavedCheckIn, Score,
    SubmissionWindow, UpsertOutcome,
};
pub use self::check_in_service::CheckInService;
pub use self::dashboard::{
    AVERAGE_ALERT_THRESHOLD, Alert, AlertKind, AlertPolicy, DROP_ALERT_THRESHOLD,
    DashboardAnalytics, DashboardSummary, MetricAverages, SUMMARY_WINDOW_DAYS, TREND_WINDOW_DAYS,
    TrendPoint, average, build_trend_series, current_streak, detect_alerts, weekly_averages,
};
pub use self::dashboard_service::DashboardService;
pub use self::demo_account::{
    DEMO_HISTORY_DAYS, DemoAccount, DemoAccountSeeder, DemoSeedError, DemoSeedOutcome,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AccountStatus, DisplayName, EmailAddress, NewUser, User, UserDraft, UserId, UserProfile,
    UserValidationError,
};
pub use self::verification::{
    InvalidVerificationCode, PendingVerification, ResendTooSoon, VERIFICATION_RESEND_COOLDOWN_SECS,
    VerificationCode, VerificationPolicy,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use sentinela::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
