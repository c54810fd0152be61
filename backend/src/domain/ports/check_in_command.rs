//! Driving port for check-in submissions.

use async_trait::async_trait;

use crate::domain::{CalendarDay, CheckIn, Error, RawScores, UpsertOutcome, UserId};

/// Submission for one day. `day` defaults to today.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitCheckInRequest {
    pub user_id: UserId,
    pub day: Option<CalendarDay>,
    pub scores: RawScores,
    pub notes: Option<String>,
}

/// Stored check-in and whether it was created or updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCheckInResponse {
    pub check_in: CheckIn,
    pub outcome: UpsertOutcome,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInCommand: Send + Sync {
    /// Validate, clamp, and upsert a check-in.
    async fn submit(&self, request: SubmitCheckInRequest) -> Result<SubmitCheckInResponse, Error>;
}
