//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversion into domain
//! types goes through the validating domain constructors so a corrupt row
//! surfaces as a query error instead of an invalid value.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::Bool;

use super::schema::{check_ins, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub display_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub verification_code: Option<String>,
    pub verification_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column selected with the row")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for registering a pending account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub display_name: &'a str,
    pub birth_date: NaiveDate,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub status: &'a str,
    pub verification_code: &'a str,
    pub verification_sent_at: DateTime<Utc>,
}

/// Row struct for reading from the check_ins table.
///
/// Also derives `QueryableByName` so the raw upsert can embed it.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = check_ins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CheckInRow {
    pub id: i64,
    pub user_id: i64,
    pub checked_on: NaiveDate,
    pub energy: i16,
    pub focus: i16,
    pub emotional_balance: i16,
    pub sleep_quality: i16,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column selected with the row")]
    pub updated_at: DateTime<Utc>,
}

/// Result of the `INSERT .. ON CONFLICT .. RETURNING` upsert.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct UpsertedCheckInRow {
    #[diesel(embed)]
    pub check_in: CheckInRow,
    /// `true` when the statement inserted rather than updated.
    #[diesel(sql_type = Bool)]
    pub inserted: bool,
}
