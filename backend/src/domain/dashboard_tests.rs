//! Tests for dashboard aggregation.

use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{CheckInDraft, CheckInId, CheckInScores, Score, UserId};

#[fixture]
fn today() -> CalendarDay {
    CalendarDay::parse_iso("2026-04-20").expect("fixture date")
}

fn stamp(day: CalendarDay) -> DateTime<Utc> {
    day.start()
}

fn check_in(day: CalendarDay, value: i16) -> CheckIn {
    check_in_with(day, [value; 4])
}

fn check_in_with(day: CalendarDay, [energy, focus, balance, sleep]: [i16; 4]) -> CheckIn {
    let score = |v| Score::new(v).expect("score in range");
    CheckIn::new(CheckInDraft {
        id: CheckInId::new(day.days_since(CalendarDay::parse_iso("2026-01-01").expect("date"))),
        user_id: UserId::new(1).expect("user id"),
        day,
        scores: CheckInScores {
            energy: score(energy),
            focus: score(focus),
            emotional_balance: score(balance),
            sleep_quality: score(sleep),
        },
        notes: None,
        created_at: stamp(day),
    })
}

fn point(day: CalendarDay, energy: Option<i16>) -> TrendPoint {
    TrendPoint {
        day,
        energy,
        focus: Some(8),
        emotional_balance: Some(8),
        sleep_quality: Some(8),
    }
}

#[rstest]
#[case(&[], None)]
#[case(&[None, None], None)]
#[case(&[Some(4), Some(6)], Some(5.0))]
#[case(&[Some(1), Some(2), Some(2)], Some(1.7))]
#[case(&[Some(10), None], Some(10.0))]
fn average_ignores_missing(#[case] values: &[Option<i16>], #[case] expected: Option<f64>) {
    assert_eq!(average(values), expected);
}

#[rstest]
fn streak_counts_consecutive_days_from_today(today: CalendarDay) {
    let records = vec![
        check_in(today, 7),
        check_in(today.minus_days(1), 7),
        check_in(today.minus_days(2), 7),
        check_in(today.minus_days(4), 7),
    ];
    assert_eq!(current_streak(&records, today), 3);
}

#[rstest]
fn streak_is_zero_without_todays_check_in(today: CalendarDay) {
    let records = vec![
        check_in(today.minus_days(1), 7),
        check_in(today.minus_days(2), 7),
    ];
    assert_eq!(current_streak(&records, today), 0);
}

#[rstest]
fn streak_skips_repeated_days(today: CalendarDay) {
    let records = vec![
        check_in(today, 7),
        check_in(today, 6),
        check_in(today.minus_days(1), 7),
    ];
    assert_eq!(current_streak(&records, today), 2);
}

#[rstest]
fn streak_of_empty_history_is_zero(today: CalendarDay) {
    assert_eq!(current_streak(&[], today), 0);
}

#[rstest]
fn trend_series_spans_full_window(today: CalendarDay) {
    let records = vec![check_in(today.minus_days(3), 5)];
    let series = build_trend_series(&records, today, TREND_WINDOW_DAYS);

    assert_eq!(series.len(), 21);
    assert_eq!(series.first().map(|p| p.day), Some(today.minus_days(20)));
    assert_eq!(series.last().map(|p| p.day), Some(today));
    let filled: Vec<_> = series.iter().filter(|p| p.energy.is_some()).collect();
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].day, today.minus_days(3));
}

#[rstest]
fn trend_series_is_empty_for_zero_window(today: CalendarDay) {
    assert!(build_trend_series(&[], today, 0).is_empty());
}

#[rstest]
fn weekly_averages_use_trailing_points(today: CalendarDay) {
    let records: Vec<_> = (0..14)
        .map(|offset| check_in(today.minus_days(offset), if offset < 7 { 8 } else { 2 }))
        .collect();
    let series = build_trend_series(&records, today, TREND_WINDOW_DAYS);

    assert_eq!(weekly_averages(&series).energy, Some(8.0));
}

#[rstest]
fn drop_rule_emits_single_alert(today: CalendarDay) {
    let series = vec![
        point(today.minus_days(2), Some(8)),
        point(today.minus_days(1), Some(8)),
        point(today, Some(4)),
    ];
    let alerts = detect_alerts(&series, &AlertPolicy::default());
    let drops: Vec<_> = alerts
        .iter()
        .filter(|a| matches!(a.kind, AlertKind::Drop { .. }))
        .collect();

    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].metric, Metric::Energy);
    assert_eq!(
        drops[0].kind,
        AlertKind::Drop {
            from: 8,
            to: 4,
            magnitude: 4,
            start_date: today.minus_days(2),
            end_date: today,
        }
    );
}

#[rstest]
fn drop_rule_reports_each_window_once(today: CalendarDay) {
    let series = vec![
        point(today.minus_days(4), Some(8)),
        point(today.minus_days(3), Some(8)),
        point(today.minus_days(2), Some(4)),
        point(today.minus_days(1), Some(4)),
        point(today, Some(4)),
    ];
    let drops = detect_alerts(&series, &AlertPolicy::default())
        .into_iter()
        .filter(|a| matches!(a.kind, AlertKind::Drop { .. }))
        .count();

    assert_eq!(drops, 2);
}

#[rstest]
fn missing_day_breaks_drop_run(today: CalendarDay) {
    let series = vec![
        point(today.minus_days(3), Some(9)),
        point(today.minus_days(2), Some(9)),
        point(today.minus_days(1), None),
        point(today, Some(3)),
    ];
    let alerts = detect_alerts(&series, &AlertPolicy::default());
    assert!(
        alerts
            .iter()
            .all(|a| !matches!(a.kind, AlertKind::Drop { .. }))
    );
}

#[rstest]
fn drop_of_exactly_threshold_is_ignored(today: CalendarDay) {
    let series = vec![
        point(today.minus_days(2), Some(9)),
        point(today.minus_days(1), Some(8)),
        point(today, Some(7)),
    ];
    assert!(detect_alerts(&series, &AlertPolicy::default()).is_empty());
}

#[rstest]
fn average_rule_flags_low_metrics(today: CalendarDay) {
    let records = vec![
        check_in_with(today, [5, 9, 9, 9]),
        check_in_with(today.minus_days(1), [5, 9, 9, 9]),
    ];
    let series = build_trend_series(&records, today, TREND_WINDOW_DAYS);
    let alerts = detect_alerts(&series, &AlertPolicy::default());

    assert_eq!(alerts, vec![Alert {
        metric: Metric::Energy,
        kind: AlertKind::Average { average: 5.0 },
    }]);
}

#[rstest]
fn alerts_ignore_points_before_the_trailing_week(today: CalendarDay) {
    let records = vec![
        check_in(today.minus_days(12), 9),
        check_in(today.minus_days(11), 9),
        check_in(today.minus_days(10), 1),
        check_in(today, 9),
    ];
    let series = build_trend_series(&records, today, TREND_WINDOW_DAYS);
    assert!(detect_alerts(&series, &AlertPolicy::default()).is_empty());
}

#[rstest]
fn analytics_serialise_alert_shape(today: CalendarDay) {
    let records = vec![
        check_in(today.minus_days(2), 9),
        check_in(today.minus_days(1), 9),
        check_in_with(today, [3, 9, 9, 9]),
    ];
    let analytics = DashboardAnalytics::compute(&records, today, &AlertPolicy::default());
    let value = serde_json::to_value(&analytics).expect("json");

    assert_eq!(value["series"].as_array().map(Vec::len), Some(21));
    let alert = &value["alerts"][0];
    assert_eq!(alert["metric"], "energy");
    assert_eq!(alert["type"], "drop");
    assert_eq!(alert["magnitude"], 6);
    assert_eq!(alert["startDate"], today.minus_days(2).to_string());
}

#[rstest]
#[case(Metric::Energy, 1)]
#[case(Metric::Focus, 2)]
#[case(Metric::EmotionalBalance, 3)]
#[case(Metric::SleepQuality, 4)]
fn accessors_select_the_named_metric(
    today: CalendarDay,
    #[case] metric: Metric,
    #[case] score: i16,
) {
    let record = check_in_with(today, [1, 2, 3, 4]);
    let series = build_trend_series(std::slice::from_ref(&record), today, 1);
    assert_eq!(series[0].value(metric), Some(score));

    let averages = MetricAverages::of_check_ins(&[record]);
    assert_eq!(averages.get(metric), Some(f64::from(score)));
}
