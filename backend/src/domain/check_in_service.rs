//! Check-in domain service.
//!
//! Implements the check-in driving ports: submissions resolve the target day
//! against the injected clock, enforce the submission window, clamp scores,
//! and upsert through the repository.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    CheckInCommand, CheckInQuery, CheckInRepository, CheckInRepositoryError, SubmissionDay,
    SubmitCheckInRequest, SubmitCheckInResponse,
};
use crate::domain::{
    CalendarDay, CheckIn, CheckInNotes, CheckInScores, CheckInValidationError, Error,
    SubmissionWindow, UserId,
};

pub(crate) fn map_repository_error(error: CheckInRepositoryError) -> Error {
    match error {
        CheckInRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("check-in repository unavailable: {message}"))
        }
        CheckInRepositoryError::Query { message } => {
            Error::internal(format!("check-in repository error: {message}"))
        }
    }
}

fn validation_error(error: CheckInValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

/// Service implementing [`CheckInCommand`] and [`CheckInQuery`].
pub struct CheckInService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    window: SubmissionWindow,
}

impl<R> Clone for CheckInService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            window: self.window,
        }
    }
}

impl<R> CheckInService<R> {
    /// Create a service with the default seven-day submission window.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_window(repo, clock, SubmissionWindow::default())
    }

    pub fn with_window(repo: Arc<R>, clock: Arc<dyn Clock>, window: SubmissionWindow) -> Self {
        Self {
            repo,
            clock,
            window,
        }
    }

    fn current_day(&self) -> CalendarDay {
        CalendarDay::today(self.clock.as_ref())
    }
}

#[async_trait]
impl<R> CheckInCommand for CheckInService<R>
where
    R: CheckInRepository,
{
    async fn submit(&self, request: SubmitCheckInRequest) -> Result<SubmitCheckInResponse, Error> {
        let SubmitCheckInRequest {
            user_id,
            day,
            scores,
            notes,
        } = request;
        let today = self.current_day();
        let day = self
            .window
            .admit(day.unwrap_or(today), today)
            .map_err(validation_error)?;
        let scores = CheckInScores::from_raw(scores).map_err(validation_error)?;
        let notes = match notes {
            Some(text) => CheckInNotes::new(text).map_err(validation_error)?,
            None => None,
        };

        let saved = self
            .repo
            .upsert_for_day(user_id, day, scores, notes)
            .await
            .map_err(map_repository_error)?;
        debug!(
            user_id = %user_id,
            day = %day,
            outcome = ?saved.outcome,
            "check-in stored"
        );
        Ok(SubmitCheckInResponse {
            check_in: saved.check_in,
            outcome: saved.outcome,
        })
    }
}

#[async_trait]
impl<R> CheckInQuery for CheckInService<R>
where
    R: CheckInRepository,
{
    async fn list(&self, user_id: UserId) -> Result<Vec<CheckIn>, Error> {
        self.repo
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn for_day(&self, user_id: UserId, day: CalendarDay) -> Result<CheckIn, Error> {
        self.repo
            .find_for_day(user_id, day)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("no check-in recorded for {day}")))
    }

    async fn today(&self, user_id: UserId) -> Result<Option<CheckIn>, Error> {
        self.repo
            .find_for_day(user_id, self.current_day())
            .await
            .map_err(map_repository_error)
    }

    async fn submission_days(&self, user_id: UserId) -> Result<Vec<SubmissionDay>, Error> {
        let today = self.current_day();
        let days = self.window.days(today);
        let Some(oldest) = days.last().copied() else {
            return Ok(Vec::new());
        };
        let recorded: HashSet<CalendarDay> = self
            .repo
            .list_since(user_id, oldest)
            .await
            .map_err(map_repository_error)?
            .iter()
            .map(CheckIn::day)
            .collect();
        Ok(days
            .into_iter()
            .map(|day| SubmissionDay {
                day,
                is_today: day == today,
                has_check_in: recorded.contains(&day),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "check_in_service_tests.rs"]
mod tests;
