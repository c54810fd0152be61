//! Check-in request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{SubmissionDay, SubmitCheckInResponse};
use crate::domain::{CheckIn, CheckInNotes, Error, NoteSections, RawScores, UpsertOutcome};
use crate::inbound::http::validation::field_error;

/// Request body for `POST /api/v1/check-ins`.
///
/// Scores are rounded and clamped to `0..=10`. Notes may be sent either as
/// free text in `notes` or as the three guided prompts, not both.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// `YYYY-MM-DD`; defaults to today (UTC).
    #[schema(example = "2026-02-24")]
    pub date: Option<String>,
    #[schema(example = 7)]
    pub energy: f64,
    pub focus: f64,
    pub emotional_balance: f64,
    pub sleep_quality: f64,
    pub notes: Option<String>,
    pub triggers: Option<String>,
    pub highlight: Option<String>,
    pub intention: Option<String>,
}

impl CheckInRequest {
    pub(crate) fn raw_scores(&self) -> RawScores {
        RawScores {
            energy: self.energy,
            focus: self.focus,
            emotional_balance: self.emotional_balance,
            sleep_quality: self.sleep_quality,
        }
    }

    /// Free-text notes, composing the guided prompts when they are used.
    pub(crate) fn take_notes(&mut self) -> Result<Option<String>, Error> {
        let guided = self.triggers.is_some() || self.highlight.is_some() || self.intention.is_some();
        if !guided {
            return Ok(self.notes.take());
        }
        if self.notes.is_some() {
            return Err(field_error(
                "notes",
                "conflicting_notes",
                "send either notes or triggers/highlight/intention, not both",
            ));
        }
        let composed = CheckInNotes::compose(
            self.triggers.as_deref().unwrap_or_default(),
            self.highlight.as_deref().unwrap_or_default(),
            self.intention.as_deref().unwrap_or_default(),
        )
        .map_err(|err| field_error("notes", "notes_too_long", err.to_string()))?;
        Ok(composed.map(String::from))
    }
}

/// Labelled parts of composed notes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteSectionsResponse {
    pub triggers: Option<String>,
    pub highlight: Option<String>,
    pub intention: Option<String>,
    pub other: Option<String>,
}

impl From<NoteSections> for NoteSectionsResponse {
    fn from(sections: NoteSections) -> Self {
        Self {
            triggers: sections.triggers,
            highlight: sections.highlight,
            intention: sections.intention,
            other: sections.other,
        }
    }
}

/// Stored check-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub id: i64,
    #[schema(example = "2026-02-24")]
    pub date: String,
    pub energy: i16,
    pub focus: i16,
    pub emotional_balance: i16,
    pub sleep_quality: i16,
    pub notes: Option<String>,
    pub note_sections: Option<NoteSectionsResponse>,
    pub created_at: String,
}

impl From<CheckIn> for CheckInResponse {
    fn from(check_in: CheckIn) -> Self {
        let scores = *check_in.scores();
        let notes = check_in.notes();
        Self {
            id: check_in.id().get(),
            date: check_in.day().to_string(),
            energy: scores.energy.get(),
            focus: scores.focus.get(),
            emotional_balance: scores.emotional_balance.get(),
            sleep_quality: scores.sleep_quality.get(),
            notes: notes.map(|notes| notes.as_ref().to_owned()),
            note_sections: notes.map(|notes| notes.sections().into()),
            created_at: check_in.created_at().to_rfc3339(),
        }
    }
}

/// Whether the submission created or replaced the day's check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeResponse {
    Created,
    Updated,
}

impl From<UpsertOutcome> for OutcomeResponse {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Created => Self::Created,
            UpsertOutcome::Updated => Self::Updated,
        }
    }
}

/// Response body for `POST /api/v1/check-ins`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCheckInResponseBody {
    pub check_in: CheckInResponse,
    pub outcome: OutcomeResponse,
}

impl From<SubmitCheckInResponse> for SubmitCheckInResponseBody {
    fn from(response: SubmitCheckInResponse) -> Self {
        Self {
            check_in: response.check_in.into(),
            outcome: response.outcome.into(),
        }
    }
}

/// One selectable day in the submission window.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDayResponse {
    pub date: String,
    pub is_today: bool,
    pub has_check_in: bool,
}

impl From<SubmissionDay> for SubmissionDayResponse {
    fn from(day: SubmissionDay) -> Self {
        Self {
            date: day.day.to_string(),
            is_today: day.is_today,
            has_check_in: day.has_check_in,
        }
    }
}

/// Today's check-in, if one exists.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub check_in: Option<CheckInResponse>,
}
