//! Daily wellness check-ins.
//!
//! A check-in records four scores and optional notes for one user on one
//! calendar day. At most one check-in exists per `(user, day)`; submitting
//! again for the same day updates the scores and notes in place.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{CalendarDay, DayWindow};
use super::user::UserId;

/// Lowest accepted score.
pub const SCORE_MIN: i16 = 0;
/// Highest accepted score.
pub const SCORE_MAX: i16 = 10;
/// Maximum stored note length in characters.
pub const NOTES_MAX: usize = 2_000;
/// Days before today that still accept submissions.
pub const SUBMISSION_TRAILING_DAYS: u32 = 7;

/// Validation failures for check-in input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckInValidationError {
    #[error("{metric} score must be a finite number")]
    NonFiniteScore { metric: Metric },
    #[error("score {value} is outside {SCORE_MIN}..={SCORE_MAX}")]
    ScoreOutOfRange { value: i64 },
    #[error("notes must be at most {max} characters")]
    NotesTooLong { max: usize },
    #[error("check-ins cannot be recorded for future days ({day})")]
    DayInFuture { day: CalendarDay },
    #[error("{day} is older than the {trailing_days}-day submission window")]
    DayOutsideWindow { day: CalendarDay, trailing_days: u32 },
}

impl CheckInValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> String {
        match self {
            Self::NonFiniteScore { metric } => metric.field_name().to_owned(),
            Self::ScoreOutOfRange { .. } => "score".to_owned(),
            Self::NotesTooLong { .. } => "notes".to_owned(),
            Self::DayInFuture { .. } | Self::DayOutsideWindow { .. } => "date".to_owned(),
        }
    }
}

/// Tracked wellness dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Energy,
    Focus,
    EmotionalBalance,
    SleepQuality,
}

impl Metric {
    /// Every metric in display order.
    pub const ALL: [Self; 4] = [
        Self::Energy,
        Self::Focus,
        Self::EmotionalBalance,
        Self::SleepQuality,
    ];

    /// JSON field name used by the HTTP surface.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Focus => "focus",
            Self::EmotionalBalance => "emotionalBalance",
            Self::SleepQuality => "sleepQuality",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Integer score in `SCORE_MIN..=SCORE_MAX`.
///
/// # Examples
/// ```
/// use sentinela::domain::Score;
///
/// assert_eq!(Score::clamped(7.6).expect("finite").get(), 8);
/// assert_eq!(Score::clamped(42.0).expect("finite").get(), 10);
/// assert_eq!(Score::clamped(-3.0).expect("finite").get(), 0);
/// assert!(Score::clamped(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(i16);

/// Marker error for non-finite raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonFiniteScore;

impl Score {
    /// Strict constructor for stored values.
    pub fn new(value: i16) -> Result<Self, CheckInValidationError> {
        if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
            return Err(CheckInValidationError::ScoreOutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Round to the nearest integer, then clamp into range.
    ///
    /// Out-of-range user input is accepted leniently; only NaN and
    /// infinities are refused.
    pub fn clamped(raw: f64) -> Result<Self, NonFiniteScore> {
        if !raw.is_finite() {
            return Err(NonFiniteScore);
        }
        let bounded = raw
            .round()
            .clamp(f64::from(SCORE_MIN), f64::from(SCORE_MAX));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is rounded and clamped into 0..=10"
        )]
        let value = bounded as i16;
        Ok(Self(value))
    }

    pub const fn get(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Score {
    type Error = CheckInValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i16 {
    fn from(value: Score) -> Self {
        value.0
    }
}

/// Scores as submitted, before rounding and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScores {
    pub energy: f64,
    pub focus: f64,
    pub emotional_balance: f64,
    pub sleep_quality: f64,
}

/// The four normalised scores of a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInScores {
    pub energy: Score,
    pub focus: Score,
    pub emotional_balance: Score,
    pub sleep_quality: Score,
}

impl CheckInScores {
    /// Round and clamp every raw score.
    pub fn from_raw(raw: RawScores) -> Result<Self, CheckInValidationError> {
        let clamp = |metric: Metric, value: f64| {
            Score::clamped(value).map_err(|NonFiniteScore| {
                CheckInValidationError::NonFiniteScore { metric }
            })
        };
        Ok(Self {
            energy: clamp(Metric::Energy, raw.energy)?,
            focus: clamp(Metric::Focus, raw.focus)?,
            emotional_balance: clamp(Metric::EmotionalBalance, raw.emotional_balance)?,
            sleep_quality: clamp(Metric::SleepQuality, raw.sleep_quality)?,
        })
    }

    pub fn get(&self, metric: Metric) -> Score {
        match metric {
            Metric::Energy => self.energy,
            Metric::Focus => self.focus,
            Metric::EmotionalBalance => self.emotional_balance,
            Metric::SleepQuality => self.sleep_quality,
        }
    }
}

const TRIGGERS_LABEL: &str = "Triggers";
const HIGHLIGHT_LABEL: &str = "Highlight";
const INTENTION_LABEL: &str = "Intention";
const SECTION_SEPARATOR: &str = " | ";

/// Free-text notes attached to a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckInNotes(String);

/// Labelled parts recovered from composed notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSections {
    pub triggers: Option<String>,
    pub highlight: Option<String>,
    pub intention: Option<String>,
    /// Text that did not carry a known label.
    pub other: Option<String>,
}

impl CheckInNotes {
    /// Trim free text; blank input means no notes.
    pub fn new(raw: impl AsRef<str>) -> Result<Option<Self>, CheckInValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > NOTES_MAX {
            return Err(CheckInValidationError::NotesTooLong { max: NOTES_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Join the labelled prompts as `Triggers: … | Highlight: … | Intention: …`,
    /// skipping blank answers.
    ///
    /// # Examples
    /// ```
    /// use sentinela::domain::CheckInNotes;
    ///
    /// let notes = CheckInNotes::compose("deadline", " ", "walk at lunch")
    ///     .expect("short notes")
    ///     .expect("some text");
    /// assert_eq!(notes.as_ref(), "Triggers: deadline | Intention: walk at lunch");
    /// ```
    pub fn compose(
        triggers: &str,
        highlight: &str,
        intention: &str,
    ) -> Result<Option<Self>, CheckInValidationError> {
        let joined = [
            (TRIGGERS_LABEL, triggers),
            (HIGHLIGHT_LABEL, highlight),
            (INTENTION_LABEL, intention),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| format!("{label}: {value}"))
        })
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);
        Self::new(joined)
    }

    /// Best-effort split back into labelled parts.
    pub fn sections(&self) -> NoteSections {
        let mut sections = NoteSections::default();
        let mut unlabelled = Vec::new();
        for part in self.0.split(SECTION_SEPARATOR) {
            let labelled = part
                .split_once(": ")
                .map(|(label, value)| (label.trim(), value.trim().to_owned()));
            match labelled {
                Some((TRIGGERS_LABEL, value)) => sections.triggers = Some(value),
                Some((HIGHLIGHT_LABEL, value)) => sections.highlight = Some(value),
                Some((INTENTION_LABEL, value)) => sections.intention = Some(value),
                _ => unlabelled.push(part.trim()),
            }
        }
        if !unlabelled.is_empty() {
            sections.other = Some(unlabelled.join(SECTION_SEPARATOR));
        }
        sections
    }
}

impl AsRef<str> for CheckInNotes {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for CheckInNotes {
    type Error = CheckInValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.chars().count() > NOTES_MAX {
            return Err(CheckInValidationError::NotesTooLong { max: NOTES_MAX });
        }
        Ok(Self(value))
    }
}

impl From<CheckInNotes> for String {
    fn from(value: CheckInNotes) -> Self {
        value.0
    }
}

/// Storage-assigned check-in identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInId(i64);

impl CheckInId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Field bundle accepted by [`CheckIn::new`].
#[derive(Debug, Clone)]
pub struct CheckInDraft {
    pub id: CheckInId,
    pub user_id: UserId,
    pub day: CalendarDay,
    pub scores: CheckInScores,
    pub notes: Option<CheckInNotes>,
    pub created_at: DateTime<Utc>,
}

/// Stored check-in.
///
/// ## Invariants
/// - `id`, `user_id`, `day`, and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    id: CheckInId,
    user_id: UserId,
    #[serde(rename = "date")]
    day: CalendarDay,
    #[serde(flatten)]
    scores: CheckInScores,
    notes: Option<CheckInNotes>,
    created_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn new(draft: CheckInDraft) -> Self {
        let CheckInDraft {
            id,
            user_id,
            day,
            scores,
            notes,
            created_at,
        } = draft;
        Self {
            id,
            user_id,
            day,
            scores,
            notes,
            created_at,
        }
    }

    pub fn id(&self) -> CheckInId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn day(&self) -> CalendarDay {
        self.day
    }

    /// UTC midnight of the check-in day.
    pub fn date(&self) -> DateTime<Utc> {
        self.day.start()
    }

    pub fn scores(&self) -> &CheckInScores {
        &self.scores
    }

    pub fn notes(&self) -> Option<&CheckInNotes> {
        self.notes.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Whether an upsert inserted a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub const fn is_update(self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// Upsert result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCheckIn {
    pub check_in: CheckIn,
    pub outcome: UpsertOutcome,
}

/// Range of days that accept new or updated check-ins.
///
/// # Examples
/// ```
/// use sentinela::domain::{CalendarDay, SubmissionWindow};
///
/// let today = CalendarDay::parse_iso("2026-03-10").expect("date");
/// let window = SubmissionWindow::default();
/// assert!(window.admit(today.minus_days(7), today).is_ok());
/// assert!(window.admit(today.minus_days(8), today).is_err());
/// assert!(window.admit(today.next(), today).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionWindow {
    trailing_days: u32,
}

impl Default for SubmissionWindow {
    fn default() -> Self {
        Self {
            trailing_days: SUBMISSION_TRAILING_DAYS,
        }
    }
}

impl SubmissionWindow {
    pub const fn new(trailing_days: u32) -> Self {
        Self { trailing_days }
    }

    pub const fn trailing_days(&self) -> u32 {
        self.trailing_days
    }

    fn span(&self, today: CalendarDay) -> DayWindow {
        DayWindow::trailing(today, self.trailing_days)
    }

    /// Accept `day` iff `today - trailing_days <= day <= today`.
    pub fn admit(
        &self,
        day: CalendarDay,
        today: CalendarDay,
    ) -> Result<CalendarDay, CheckInValidationError> {
        if day > today {
            return Err(CheckInValidationError::DayInFuture { day });
        }
        if !self.span(today).contains(day) {
            return Err(CheckInValidationError::DayOutsideWindow {
                day,
                trailing_days: self.trailing_days,
            });
        }
        Ok(day)
    }

    /// Selectable days, today first.
    pub fn days(&self, today: CalendarDay) -> Vec<CalendarDay> {
        let mut days: Vec<_> = self.span(today).days().collect();
        days.reverse();
        days
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for scores, notes, and the submission window.
    use rstest::rstest;

    use super::*;

    fn day(value: &str) -> CalendarDay {
        CalendarDay::parse_iso(value).expect("fixture date")
    }

    #[rstest]
    #[case(7.4, 7)]
    #[case(7.5, 8)]
    #[case(-0.4, 0)]
    #[case(-12.0, 0)]
    #[case(10.49, 10)]
    #[case(99.9, 10)]
    fn clamped_rounds_then_bounds(#[case] raw: f64, #[case] expected: i16) {
        assert_eq!(Score::clamped(raw).expect("finite").get(), expected);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn clamped_rejects_non_finite(#[case] raw: f64) {
        assert_eq!(Score::clamped(raw), Err(NonFiniteScore));
    }

    #[rstest]
    fn strict_constructor_rejects_out_of_range() {
        assert!(Score::new(11).is_err());
        assert!(Score::new(-1).is_err());
        assert_eq!(Score::new(0).expect("in range").get(), 0);
    }

    #[rstest]
    fn raw_scores_name_the_offending_metric() {
        let raw = RawScores {
            energy: 5.0,
            focus: 5.0,
            emotional_balance: f64::NAN,
            sleep_quality: 5.0,
        };
        let err = CheckInScores::from_raw(raw).expect_err("nan score");
        assert_eq!(err.field(), "emotionalBalance");
    }

    #[rstest]
    #[case("", "", "", None)]
    #[case("work", "", "", Some("Triggers: work"))]
    #[case(" a ", "b", " c", Some("Triggers: a | Highlight: b | Intention: c"))]
    #[case("", "sunset", "", Some("Highlight: sunset"))]
    fn compose_skips_blank_sections(
        #[case] triggers: &str,
        #[case] highlight: &str,
        #[case] intention: &str,
        #[case] expected: Option<&str>,
    ) {
        let notes = CheckInNotes::compose(triggers, highlight, intention).expect("short notes");
        assert_eq!(notes.as_ref().map(AsRef::as_ref), expected);
    }

    #[rstest]
    fn sections_recover_labelled_parts() {
        let notes = CheckInNotes::compose("traffic", "", "sleep early")
            .expect("short notes")
            .expect("some text");
        let sections = notes.sections();

        assert_eq!(sections.triggers.as_deref(), Some("traffic"));
        assert_eq!(sections.highlight, None);
        assert_eq!(sections.intention.as_deref(), Some("sleep early"));
        assert_eq!(sections.other, None);
    }

    #[rstest]
    fn sections_keep_unlabelled_text() {
        let notes = CheckInNotes::new("just a quiet day").expect("short").expect("text");
        assert_eq!(notes.sections().other.as_deref(), Some("just a quiet day"));
    }

    #[rstest]
    fn notes_reject_overlong_text() {
        let err = CheckInNotes::new("x".repeat(NOTES_MAX + 1)).expect_err("too long");
        assert_eq!(err, CheckInValidationError::NotesTooLong { max: NOTES_MAX });
    }

    #[rstest]
    #[case("2026-03-10", true)]
    #[case("2026-03-03", true)]
    #[case("2026-03-02", false)]
    fn window_admits_trailing_week(#[case] raw: &str, #[case] accepted: bool) {
        let today = day("2026-03-10");
        assert_eq!(SubmissionWindow::default().admit(day(raw), today).is_ok(), accepted);
    }

    #[rstest]
    fn window_rejects_future_days() {
        let today = day("2026-03-10");
        let err = SubmissionWindow::default()
            .admit(day("2026-03-11"), today)
            .expect_err("future day");
        assert!(matches!(err, CheckInValidationError::DayInFuture { .. }));
    }

    #[rstest]
    fn window_lists_days_newest_first() {
        let days = SubmissionWindow::default().days(day("2026-03-10"));

        assert_eq!(days.len(), 8);
        assert_eq!(days.first(), Some(&day("2026-03-10")));
        assert_eq!(days.last(), Some(&day("2026-03-03")));
    }

    #[rstest]
    fn check_in_serialises_flat_scores() {
        let check_in = CheckIn::new(CheckInDraft {
            id: CheckInId::new(3),
            user_id: UserId::new(1).expect("user id"),
            day: day("2026-03-10"),
            scores: CheckInScores {
                energy: Score::new(7).expect("score"),
                focus: Score::new(6).expect("score"),
                emotional_balance: Score::new(5).expect("score"),
                sleep_quality: Score::new(8).expect("score"),
            },
            notes: None,
            created_at: day("2026-03-10").start(),
        });
        let value = serde_json::to_value(&check_in).expect("json");

        assert_eq!(value["date"], "2026-03-10");
        assert_eq!(value["energy"], 7);
        assert_eq!(value["sleepQuality"], 8);
        assert_eq!(value["userId"], 1);
        assert!(value["notes"].is_null());
    }
}
