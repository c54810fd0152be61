//! Dashboard domain service.
//!
//! Loads check-ins through the repository port and hands them to the pure
//! aggregation functions in [`crate::domain::dashboard`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::check_in_service::map_repository_error;
use crate::domain::dashboard::{
    AlertPolicy, DashboardAnalytics, DashboardSummary, MetricAverages, SUMMARY_WINDOW_DAYS,
    TREND_WINDOW_DAYS, current_streak,
};
use crate::domain::ports::{CheckInRepository, DashboardQuery};
use crate::domain::{CalendarDay, Error, UserId};

/// Service implementing [`DashboardQuery`].
pub struct DashboardService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    alerts: AlertPolicy,
}

impl<R> Clone for DashboardService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            alerts: self.alerts,
        }
    }
}

impl<R> DashboardService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            alerts: AlertPolicy::default(),
        }
    }
}

#[async_trait]
impl<R> DashboardQuery for DashboardService<R>
where
    R: CheckInRepository,
{
    async fn summary(&self, user_id: UserId) -> Result<DashboardSummary, Error> {
        let today = CalendarDay::today(self.clock.as_ref());
        // The streak may reach past the summary window, so it reads the full
        // history.
        let history = self
            .repo
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)?;
        let threshold = today.minus_days(SUMMARY_WINDOW_DAYS);
        let recent: Vec<_> = history
            .iter()
            .filter(|record| record.day() >= threshold)
            .cloned()
            .collect();

        Ok(DashboardSummary {
            averages: MetricAverages::of_check_ins(&recent),
            latest: history.first().cloned(),
            current_streak: current_streak(&history, today),
            checked_in_today: history.iter().any(|record| record.day() == today),
            recent,
        })
    }

    async fn analytics(&self, user_id: UserId) -> Result<DashboardAnalytics, Error> {
        let today = CalendarDay::today(self.clock.as_ref());
        let records = self
            .repo
            .list_since(user_id, today.minus_days(TREND_WINDOW_DAYS - 1))
            .await
            .map_err(map_repository_error)?;
        Ok(DashboardAnalytics::compute(&records, today, &self.alerts))
    }
}
