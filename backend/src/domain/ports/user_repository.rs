//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, PendingVerification, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage of registered accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a pending account. Fails with `DuplicateEmail` when the
    /// address is taken.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the outstanding code and send time of a pending account.
    ///
    /// Returns `false` when no pending account with `id` exists.
    async fn refresh_verification(
        &self,
        id: UserId,
        verification: &PendingVerification,
    ) -> Result<bool, UserPersistenceError>;

    /// Mark a pending account active and clear its code.
    ///
    /// Returns the updated user, or `None` when no pending account with `id`
    /// exists.
    async fn activate(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
