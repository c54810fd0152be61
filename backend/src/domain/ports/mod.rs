//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`VerificationMailer`],
//! [`SessionTokenCodec`]) are implemented by outbound adapters. Driving ports
//! (`*Command`, `*Query`) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod check_in_command;
mod check_in_query;
mod check_in_repository;
mod dashboard_query;
mod password_hasher;
mod session_token_codec;
mod user_profile_query;
mod user_repository;
mod verification_mailer;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{
    AccountCommand, AuthenticatedSession, RegistrationReceipt, VerifyAccountRequest,
};
#[cfg(test)]
pub use check_in_command::MockCheckInCommand;
pub use check_in_command::{CheckInCommand, SubmitCheckInRequest, SubmitCheckInResponse};
#[cfg(test)]
pub use check_in_query::MockCheckInQuery;
pub use check_in_query::{CheckInQuery, SubmissionDay};
#[cfg(test)]
pub use check_in_repository::MockCheckInRepository;
pub use check_in_repository::{
    CheckInRepository, CheckInRepositoryError, FixtureCheckInRepository,
};
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use session_token_codec::MockSessionTokenCodec;
pub use session_token_codec::{
    SessionIdentity, SessionToken, SessionTokenCodec, SessionTokenError,
};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use verification_mailer::MockVerificationMailer;
pub use verification_mailer::{MailerError, VerificationEmail, VerificationMailer};
