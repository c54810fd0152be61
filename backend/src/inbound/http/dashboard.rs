//! Dashboard HTTP handlers.
//!
//! ```text
//! GET /api/v1/dashboard/summary
//! GET /api/v1/dashboard/analytics
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Alert, AlertKind, DashboardAnalytics, DashboardSummary, MetricAverages, TrendPoint,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::check_ins_dto::CheckInResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Per-metric averages rounded to one decimal; `null` without data.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricAveragesResponse {
    pub energy: Option<f64>,
    pub focus: Option<f64>,
    pub emotional_balance: Option<f64>,
    pub sleep_quality: Option<f64>,
}

impl From<MetricAverages> for MetricAveragesResponse {
    fn from(averages: MetricAverages) -> Self {
        Self {
            energy: averages.energy,
            focus: averages.focus,
            emotional_balance: averages.emotional_balance,
            sleep_quality: averages.sleep_quality,
        }
    }
}

/// Home dashboard figures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Last thirty days, newest first.
    pub recent: Vec<CheckInResponse>,
    pub latest: Option<CheckInResponse>,
    pub averages: MetricAveragesResponse,
    pub current_streak: u32,
    pub checked_in_today: bool,
}

impl From<DashboardSummary> for SummaryResponse {
    fn from(value: DashboardSummary) -> Self {
        Self {
            recent: value
                .recent
                .into_iter()
                .map(CheckInResponse::from)
                .collect(),
            latest: value.latest.map(CheckInResponse::from),
            averages: value.averages.into(),
            current_streak: value.current_streak,
            checked_in_today: value.checked_in_today,
        }
    }
}

/// One day of the trend series.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPointResponse {
    pub date: String,
    pub energy: Option<i16>,
    pub focus: Option<i16>,
    pub emotional_balance: Option<i16>,
    pub sleep_quality: Option<i16>,
}

impl From<TrendPoint> for TrendPointResponse {
    fn from(point: TrendPoint) -> Self {
        Self {
            date: point.day.to_string(),
            energy: point.energy,
            focus: point.focus,
            emotional_balance: point.emotional_balance,
            sleep_quality: point.sleep_quality,
        }
    }
}

/// Alert kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AlertTypeResponse {
    Average,
    Drop,
}

/// Alert raised for one metric. `average` is set for average alerts; the
/// drop fields are set for drop alerts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    #[schema(example = "sleepQuality")]
    pub metric: String,
    #[serde(rename = "type")]
    pub kind: AlertTypeResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        let metric = alert.metric.field_name().to_owned();
        match alert.kind {
            AlertKind::Average { average } => Self {
                metric,
                kind: AlertTypeResponse::Average,
                average: Some(average),
                from: None,
                to: None,
                magnitude: None,
                start_date: None,
                end_date: None,
            },
            AlertKind::Drop {
                from,
                to,
                magnitude,
                start_date,
                end_date,
            } => Self {
                metric,
                kind: AlertTypeResponse::Drop,
                average: None,
                from: Some(from),
                to: Some(to),
                magnitude: Some(magnitude),
                start_date: Some(start_date.to_string()),
                end_date: Some(end_date.to_string()),
            },
        }
    }
}

/// Trend analytics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    /// Twenty-one days ending today, oldest first.
    pub series: Vec<TrendPointResponse>,
    pub weekly_averages: MetricAveragesResponse,
    pub alerts: Vec<AlertResponse>,
}

impl From<DashboardAnalytics> for AnalyticsResponse {
    fn from(value: DashboardAnalytics) -> Self {
        Self {
            series: value
                .series
                .into_iter()
                .map(TrendPointResponse::from)
                .collect(),
            weekly_averages: value.weekly_averages.into(),
            alerts: value
                .alerts
                .into_iter()
                .map(AlertResponse::from)
                .collect(),
        }
    }
}

/// Recent history, averages, and streak for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    responses(
        (status = 200, description = "Dashboard summary", body = SummaryResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboardSummary",
    security(("SessionCookie" = []))
)]
#[get("/dashboard/summary")]
pub async fn summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let figures = state.dashboard.summary(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(SummaryResponse::from(figures)))
}

/// Trend series, weekly averages, and alerts for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/analytics",
    responses(
        (status = 200, description = "Dashboard analytics", body = AnalyticsResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboardAnalytics",
    security(("SessionCookie" = []))
)]
#[get("/dashboard/analytics")]
pub async fn analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let figures = state.dashboard.analytics(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(AnalyticsResponse::from(figures)))
}
