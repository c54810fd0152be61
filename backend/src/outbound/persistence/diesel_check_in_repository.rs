//! PostgreSQL-backed [`CheckInRepository`] implementation.
//!
//! The upsert is a single `INSERT .. ON CONFLICT (user_id, checked_on) DO
//! UPDATE` statement, so two concurrent submissions for the same day can
//! never leave two rows behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Date, Nullable, SmallInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CheckInRepository, CheckInRepositoryError};
use crate::domain::{
    CalendarDay, CheckIn, CheckInDraft, CheckInId, CheckInNotes, CheckInScores, SavedCheckIn,
    Score, UpsertOutcome, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CheckInRow, UpsertedCheckInRow};
use super::pool::{DbPool, PoolError};
use super::schema::check_ins;

const UPSERT_SQL: &str = r#"
INSERT INTO check_ins (user_id, checked_on, energy, focus, emotional_balance, sleep_quality, notes)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (user_id, checked_on)
DO UPDATE SET
    energy = EXCLUDED.energy,
    focus = EXCLUDED.focus,
    emotional_balance = EXCLUDED.emotional_balance,
    sleep_quality = EXCLUDED.sleep_quality,
    notes = EXCLUDED.notes,
    updated_at = now()
RETURNING
    id, user_id, checked_on, energy, focus, emotional_balance, sleep_quality, notes,
    created_at, updated_at, (xmax = 0) AS inserted
"#;

/// Diesel-backed implementation of the check-in repository port.
#[derive(Clone)]
pub struct DieselCheckInRepository {
    pool: DbPool,
}

impl DieselCheckInRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CheckInRepositoryError {
    map_basic_pool_error(error, CheckInRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CheckInRepositoryError {
    map_basic_diesel_error(
        error,
        CheckInRepositoryError::query,
        CheckInRepositoryError::connection,
    )
}

fn corrupt(error: impl std::fmt::Display) -> CheckInRepositoryError {
    CheckInRepositoryError::query(format!("stored check-in is invalid: {error}"))
}

fn row_to_check_in(row: CheckInRow) -> Result<CheckIn, CheckInRepositoryError> {
    let CheckInRow {
        id,
        user_id,
        checked_on,
        energy,
        focus,
        emotional_balance,
        sleep_quality,
        notes,
        created_at,
        updated_at: _,
    } = row;

    let scores = CheckInScores {
        energy: Score::new(energy).map_err(corrupt)?,
        focus: Score::new(focus).map_err(corrupt)?,
        emotional_balance: Score::new(emotional_balance).map_err(corrupt)?,
        sleep_quality: Score::new(sleep_quality).map_err(corrupt)?,
    };
    let notes = notes
        .map(CheckInNotes::try_from)
        .transpose()
        .map_err(corrupt)?;

    Ok(CheckIn::new(CheckInDraft {
        id: CheckInId::new(id),
        user_id: UserId::new(user_id).map_err(corrupt)?,
        day: CalendarDay::from_date(checked_on),
        scores,
        notes,
        created_at,
    }))
}

fn rows_to_check_ins(rows: Vec<CheckInRow>) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
    rows.into_iter().map(row_to_check_in).collect()
}

#[async_trait]
impl CheckInRepository for DieselCheckInRepository {
    async fn find_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = check_ins::table
            .filter(check_ins::user_id.eq(user_id.get()))
            .filter(check_ins::checked_on.eq(day.date()))
            .select(CheckInRow::as_select())
            .first::<CheckInRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_check_in).transpose()
    }

    async fn upsert_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
        scores: CheckInScores,
        notes: Option<CheckInNotes>,
    ) -> Result<SavedCheckIn, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let notes: Option<String> = notes.map(|text| text.as_ref().to_owned());
        let upserted = sql_query(UPSERT_SQL)
            .bind::<BigInt, _>(user_id.get())
            .bind::<Date, _>(day.date())
            .bind::<SmallInt, _>(scores.energy.get())
            .bind::<SmallInt, _>(scores.focus.get())
            .bind::<SmallInt, _>(scores.emotional_balance.get())
            .bind::<SmallInt, _>(scores.sleep_quality.get())
            .bind::<Nullable<Text>, _>(notes)
            .get_result::<UpsertedCheckInRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let outcome = if upserted.inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        Ok(SavedCheckIn {
            check_in: row_to_check_in(upserted.check_in)?,
            outcome,
        })
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = check_ins::table
            .filter(check_ins::user_id.eq(user_id.get()))
            .order((check_ins::checked_on.desc(), check_ins::id.desc()))
            .select(CheckInRow::as_select())
            .load::<CheckInRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_check_ins(rows)
    }

    async fn list_since(
        &self,
        user_id: UserId,
        threshold: CalendarDay,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = check_ins::table
            .filter(check_ins::user_id.eq(user_id.get()))
            .filter(check_ins::checked_on.ge(threshold.date()))
            .order((check_ins::checked_on.desc(), check_ins::id.desc()))
            .select(CheckInRow::as_select())
            .load::<CheckInRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_check_ins(rows)
    }
}
