//! Port for check-in persistence keyed by `(user, day)`.

use async_trait::async_trait;

use crate::domain::{CalendarDay, CheckIn, CheckInNotes, CheckInScores, SavedCheckIn, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by check-in repository adapters.
    pub enum CheckInRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "check-in repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "check-in repository query failed: {message}",
    }
}

/// Port for reading and upserting daily check-ins.
///
/// Listings are ordered by day descending, then id descending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Check-in recorded for `day`, if any.
    async fn find_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError>;

    /// Insert or replace the check-in for `day` in one atomic step.
    ///
    /// Updates keep the original id, day, and creation time.
    async fn upsert_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
        scores: CheckInScores,
        notes: Option<CheckInNotes>,
    ) -> Result<SavedCheckIn, CheckInRepositoryError>;

    /// Every check-in of a user, newest first.
    async fn list_for_user(&self, user_id: UserId)
    -> Result<Vec<CheckIn>, CheckInRepositoryError>;

    /// Check-ins on or after `threshold`, newest first.
    async fn list_since(
        &self,
        user_id: UserId,
        threshold: CalendarDay,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError>;
}

/// Fixture implementation for tests that do not exercise check-in storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCheckInRepository;

#[async_trait]
impl CheckInRepository for FixtureCheckInRepository {
    async fn find_for_day(
        &self,
        _user_id: UserId,
        _day: CalendarDay,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        Ok(None)
    }

    async fn upsert_for_day(
        &self,
        _user_id: UserId,
        _day: CalendarDay,
        _scores: CheckInScores,
        _notes: Option<CheckInNotes>,
    ) -> Result<SavedCheckIn, CheckInRepositoryError> {
        Err(CheckInRepositoryError::query(
            "fixture repository does not store check-ins",
        ))
    }

    async fn list_for_user(
        &self,
        _user_id: UserId,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_since(
        &self,
        _user_id: UserId,
        _threshold: CalendarDay,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        Ok(Vec::new())
    }
}
