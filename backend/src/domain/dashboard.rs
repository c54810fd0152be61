//! Dashboard aggregation over stored check-ins.
//!
//! Everything here is pure arithmetic over records already loaded from the
//! store: averages, the current streak, the fixed-length trend series, and
//! threshold/drop alerts.

use std::collections::HashSet;

use serde::Serialize;

use super::calendar::{CalendarDay, DayWindow};
use super::check_in::{CheckIn, Metric};

/// Days covered by the analytics trend series.
pub const TREND_WINDOW_DAYS: u32 = 21;
/// Points considered by weekly averages and alerts.
pub const WEEKLY_WINDOW_DAYS: usize = 7;
/// Days of history shown on the summary.
pub const SUMMARY_WINDOW_DAYS: u32 = 30;
/// Weekly averages strictly below this raise an alert.
pub const AVERAGE_ALERT_THRESHOLD: f64 = 6.0;
/// Drops strictly larger than this across three readings raise an alert.
pub const DROP_ALERT_THRESHOLD: i16 = 2;

const DROP_RUN_LEN: usize = 3;

/// Mean of the present values rounded to one decimal place.
///
/// Returns `None` when no value is present.
///
/// # Examples
/// ```
/// use sentinela::domain::average;
///
/// assert_eq!(average(&[]), None);
/// assert_eq!(average(&[None, None]), None);
/// assert_eq!(average(&[Some(4), None, Some(6)]), Some(5.0));
/// assert_eq!(average(&[Some(7), Some(8), Some(8)]), Some(7.7));
/// ```
pub fn average(values: &[Option<i16>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().map(|v| f64::from(*v)).collect();
    if present.is_empty() {
        return None;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts are bounded by the trend window"
    )]
    let mean = present.iter().sum::<f64>() / present.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Consecutive days ending today that carry a check-in.
///
/// `records` must be ordered newest first. A record whose distance from
/// today equals the running count extends the streak; a larger distance is a
/// gap and ends the scan; a smaller one (a repeat day) is skipped.
pub fn current_streak(records: &[CheckIn], today: CalendarDay) -> u32 {
    let mut streak: u32 = 0;
    for record in records {
        let distance = today.days_since(record.day());
        match distance.cmp(&i64::from(streak)) {
            std::cmp::Ordering::Equal => streak += 1,
            std::cmp::Ordering::Greater => break,
            std::cmp::Ordering::Less => {}
        }
    }
    streak
}

/// One day of the trend series; metrics are `None` without a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Day the point covers, serialised as `date`.
    #[serde(rename = "date")]
    pub day: CalendarDay,
    /// Energy score recorded that day.
    pub energy: Option<i16>,
    /// Focus score recorded that day.
    pub focus: Option<i16>,
    /// Emotional balance score recorded that day.
    pub emotional_balance: Option<i16>,
    /// Sleep quality score recorded that day.
    pub sleep_quality: Option<i16>,
}

impl TrendPoint {
    fn empty(day: CalendarDay) -> Self {
        Self {
            day,
            energy: None,
            focus: None,
            emotional_balance: None,
            sleep_quality: None,
        }
    }

    fn from_check_in(day: CalendarDay, check_in: &CheckIn) -> Self {
        let scores = check_in.scores();
        Self {
            day,
            energy: Some(scores.energy.get()),
            focus: Some(scores.focus.get()),
            emotional_balance: Some(scores.emotional_balance.get()),
            sleep_quality: Some(scores.sleep_quality.get()),
        }
    }

    /// Score for `metric`, or `None` on a day without a check-in.
    pub fn value(&self, metric: Metric) -> Option<i16> {
        match metric {
            Metric::Energy => self.energy,
            Metric::Focus => self.focus,
            Metric::EmotionalBalance => self.emotional_balance,
            Metric::SleepQuality => self.sleep_quality,
        }
    }
}

/// Fixed-length series of `window_days` points, oldest first, ending today.
///
/// The length never depends on how much data exists.
pub fn build_trend_series(
    records: &[CheckIn],
    today: CalendarDay,
    window_days: u32,
) -> Vec<TrendPoint> {
    if window_days == 0 {
        return Vec::new();
    }
    DayWindow::trailing(today, window_days - 1)
        .days()
        .map(|day| {
            records
                .iter()
                .find(|record| record.day() == day)
                .map_or_else(|| TrendPoint::empty(day), |r| TrendPoint::from_check_in(day, r))
        })
        .collect()
}

/// Per-metric averages; `None` means no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAverages {
    /// Mean energy, one decimal place.
    pub energy: Option<f64>,
    /// Mean focus, one decimal place.
    pub focus: Option<f64>,
    /// Mean emotional balance, one decimal place.
    pub emotional_balance: Option<f64>,
    /// Mean sleep quality, one decimal place.
    pub sleep_quality: Option<f64>,
}

impl MetricAverages {
    /// Average each metric across trend points.
    pub fn of_points(points: &[TrendPoint]) -> Self {
        let per_metric =
            |metric| average(&points.iter().map(|p| p.value(metric)).collect::<Vec<_>>());
        Self {
            energy: per_metric(Metric::Energy),
            focus: per_metric(Metric::Focus),
            emotional_balance: per_metric(Metric::EmotionalBalance),
            sleep_quality: per_metric(Metric::SleepQuality),
        }
    }

    /// Average each metric across check-ins.
    pub fn of_check_ins(records: &[CheckIn]) -> Self {
        let points: Vec<_> = records
            .iter()
            .map(|record| TrendPoint::from_check_in(record.day(), record))
            .collect();
        Self::of_points(&points)
    }

    /// Average for `metric`, if any point carried it.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Energy => self.energy,
            Metric::Focus => self.focus,
            Metric::EmotionalBalance => self.emotional_balance,
            Metric::SleepQuality => self.sleep_quality,
        }
    }
}

fn trailing_week(series: &[TrendPoint], window: usize) -> &[TrendPoint] {
    &series[series.len().saturating_sub(window)..]
}

/// Averages over the trailing week of a series.
pub fn weekly_averages(series: &[TrendPoint]) -> MetricAverages {
    MetricAverages::of_points(trailing_week(series, WEEKLY_WINDOW_DAYS))
}

/// Kind of condition that raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AlertKind {
    /// Weekly average below the threshold.
    Average { average: f64 },
    /// Three consecutive readings fell by more than the threshold.
    #[serde(rename_all = "camelCase")]
    Drop {
        from: i16,
        to: i16,
        magnitude: i16,
        start_date: CalendarDay,
        end_date: CalendarDay,
    },
}

/// Alert raised for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Alert {
    pub metric: Metric,
    #[serde(flatten)]
    pub kind: AlertKind,
}

/// Thresholds used by [`detect_alerts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    pub window_days: usize,
    pub average_threshold: f64,
    pub drop_threshold: i16,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            window_days: WEEKLY_WINDOW_DAYS,
            average_threshold: AVERAGE_ALERT_THRESHOLD,
            drop_threshold: DROP_ALERT_THRESHOLD,
        }
    }
}

/// Apply the average and drop rules to the trailing week of `series`.
///
/// Average alerts come first (one per metric at most), followed by drop
/// alerts in chronological order.
pub fn detect_alerts(series: &[TrendPoint], policy: &AlertPolicy) -> Vec<Alert> {
    let week = trailing_week(series, policy.window_days);
    let mut alerts = Vec::new();

    for metric in Metric::ALL {
        let values: Vec<_> = week.iter().map(|point| point.value(metric)).collect();
        match average(&values) {
            Some(avg) if avg < policy.average_threshold => alerts.push(Alert {
                metric,
                kind: AlertKind::Average { average: avg },
            }),
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    for metric in Metric::ALL {
        let mut run: Vec<(CalendarDay, i16)> = Vec::with_capacity(DROP_RUN_LEN);
        for point in week {
            let Some(value) = point.value(metric) else {
                run.clear();
                continue;
            };
            run.push((point.day, value));
            if run.len() > DROP_RUN_LEN {
                run.remove(0);
            }
            let (Some(&(start, first)), Some(&(end, last))) = (run.first(), run.last()) else {
                continue;
            };
            if run.len() == DROP_RUN_LEN
                && first - last > policy.drop_threshold
                && seen.insert((metric, start, end))
            {
                alerts.push(Alert {
                    metric,
                    kind: AlertKind::Drop {
                        from: first,
                        to: last,
                        magnitude: first - last,
                        start_date: start,
                        end_date: end,
                    },
                });
            }
        }
    }
    alerts
}

/// Home dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Check-ins of the last thirty days, newest first.
    pub recent: Vec<CheckIn>,
    pub latest: Option<CheckIn>,
    pub averages: MetricAverages,
    pub current_streak: u32,
    pub checked_in_today: bool,
}

/// Trend analytics figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub series: Vec<TrendPoint>,
    pub weekly_averages: MetricAverages,
    pub alerts: Vec<Alert>,
}

impl DashboardAnalytics {
    /// Series, weekly averages, and alerts for records ending `today`.
    pub fn compute(records: &[CheckIn], today: CalendarDay, policy: &AlertPolicy) -> Self {
        let series = build_trend_series(records, today, TREND_WINDOW_DAYS);
        let weekly_averages = weekly_averages(&series);
        let alerts = detect_alerts(&series, policy);
        Self {
            series,
            weekly_averages,
            alerts,
        }
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
