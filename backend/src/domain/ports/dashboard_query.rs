//! Driving port for dashboard figures.

use async_trait::async_trait;

use crate::domain::{DashboardAnalytics, DashboardSummary, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Recent history, averages, and streak.
    async fn summary(&self, user_id: UserId) -> Result<DashboardSummary, Error>;

    /// Trend series, weekly averages, and alerts.
    async fn analytics(&self, user_id: UserId) -> Result<DashboardAnalytics, Error>;
}
