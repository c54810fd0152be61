//! Driving port for reading check-ins.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CalendarDay, CheckIn, Error, UserId};

/// A day the user may submit for, flagged when a check-in already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDay {
    #[serde(rename = "date")]
    pub day: CalendarDay,
    pub is_today: bool,
    pub has_check_in: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckInQuery: Send + Sync {
    /// Every check-in, newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<CheckIn>, Error>;

    /// Check-in for one day; `not_found` when absent.
    async fn for_day(&self, user_id: UserId, day: CalendarDay) -> Result<CheckIn, Error>;

    /// Today's check-in, if recorded.
    async fn today(&self, user_id: UserId) -> Result<Option<CheckIn>, Error>;

    /// Days accepted by the submission window, today first.
    async fn submission_days(&self, user_id: UserId) -> Result<Vec<SubmissionDay>, Error>;
}
