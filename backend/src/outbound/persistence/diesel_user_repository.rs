//! PostgreSQL-backed [`UserRepository`] implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    AccountStatus, CalendarDay, DisplayName, EmailAddress, NewUser, PasswordHash,
    PendingVerification, User, UserDraft, UserId, VerificationCode,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn corrupt(error: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("stored user is invalid: {error}"))
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        display_name,
        birth_date,
        email,
        password_hash,
        status,
        verification_code,
        verification_sent_at,
        created_at,
        updated_at: _,
    } = row;

    let pending_verification = match (verification_code, verification_sent_at) {
        (Some(code), Some(sent_at)) => Some(PendingVerification {
            code: VerificationCode::parse(&code).map_err(corrupt)?,
            sent_at,
        }),
        (None, None) => None,
        _ => return Err(corrupt("verification code and send time are unpaired")),
    };

    User::new(UserDraft {
        id: UserId::new(id).map_err(corrupt)?,
        display_name: DisplayName::new(display_name).map_err(corrupt)?,
        birth_date: CalendarDay::from_date(birth_date),
        email: EmailAddress::new(email).map_err(corrupt)?,
        password_hash: PasswordHash::new(password_hash),
        status: status.parse::<AccountStatus>().map_err(corrupt)?,
        pending_verification,
        created_at,
    })
    .map_err(corrupt)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            display_name: user.display_name.as_ref(),
            birth_date: user.birth_date.date(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            status: AccountStatus::PendingVerification.as_str(),
            verification_code: user.verification.code.as_str(),
            verification_sent_at: user.verification.sent_at,
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await;

        match inserted {
            Ok(stored) => row_to_user(stored),
            Err(error) if unique_violation(&error).is_some() => {
                Err(UserPersistenceError::duplicate_email(user.email.as_ref()))
            }
            Err(error) => Err(map_diesel_error(error)),
        }
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn refresh_verification(
        &self,
        id: UserId,
        verification: &PendingVerification,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            users::table
                .find(id.get())
                .filter(users::status.eq(AccountStatus::PendingVerification.as_str())),
        )
        .set((
            users::verification_code.eq(verification.code.as_str()),
            users::verification_sent_at.eq(verification.sent_at),
            users::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }

    async fn activate(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            users::table
                .find(id.get())
                .filter(users::status.eq(AccountStatus::PendingVerification.as_str())),
        )
        .set((
            users::status.eq(AccountStatus::Active.as_str()),
            users::verification_code.eq(None::<String>),
            users::verification_sent_at.eq(None::<chrono::DateTime<Utc>>),
            users::updated_at.eq(now),
        ))
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}
