//! Demo account seeding.
//!
//! Creates one active account with two weeks of sample check-ins so a fresh
//! deployment has a populated dashboard to sign in to. Seeding is idempotent:
//! an existing account with the demo email is left untouched.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::ports::{
    CheckInRepository, CheckInRepositoryError, PasswordHasher, PasswordHasherError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    CalendarDay, CheckInScores, DisplayName, EmailAddress, NewUser, PendingVerification, Score,
    UserId, VerificationCode,
};

/// Days of sample check-ins written for a new demo account.
pub const DEMO_HISTORY_DAYS: u32 = 14;

/// Daily `(energy, focus, emotional balance, sleep quality)` samples, oldest
/// first. The final days dip so the analytics view shows alerts.
const DEMO_SCORES: [(i16, i16, i16, i16); DEMO_HISTORY_DAYS as usize] = [
    (7, 6, 7, 8),
    (6, 6, 7, 7),
    (8, 7, 8, 8),
    (7, 7, 6, 7),
    (6, 5, 6, 6),
    (7, 6, 7, 7),
    (8, 8, 7, 8),
    (7, 7, 7, 6),
    (6, 6, 6, 7),
    (7, 6, 5, 6),
    (8, 7, 6, 7),
    (6, 5, 5, 5),
    (5, 5, 4, 4),
    (4, 4, 4, 5),
];

const DEMO_BIRTH_DATE: &str = "1992-04-18";

/// Credentials of the demo account.
pub struct DemoAccount {
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password: Zeroizing<String>,
}

/// What [`DemoAccountSeeder::seed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoSeedOutcome {
    Created { user_id: UserId, check_ins: usize },
    AlreadyPresent,
}

/// Errors raised while seeding the demo account.
#[derive(Debug, Error)]
pub enum DemoSeedError {
    #[error("demo account could not be stored: {0}")]
    Users(#[from] UserPersistenceError),
    #[error("demo check-ins could not be stored: {0}")]
    CheckIns(#[from] CheckInRepositoryError),
    #[error("demo password could not be hashed: {0}")]
    Hashing(#[from] PasswordHasherError),
    #[error("demo account vanished before activation")]
    NotActivated,
    #[error("built-in demo data is invalid: {0}")]
    InvalidFixture(String),
}

/// Seeds the demo account through the driven ports.
pub struct DemoAccountSeeder<U, C, H> {
    users: Arc<U>,
    check_ins: Arc<C>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, C, H> DemoAccountSeeder<U, C, H>
where
    U: UserRepository,
    C: CheckInRepository,
    H: PasswordHasher,
{
    pub fn new(users: Arc<U>, check_ins: Arc<C>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            check_ins,
            hasher,
            clock,
        }
    }

    /// Create and activate the demo account unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`DemoSeedError`] when any port fails.
    pub async fn seed(&self, account: &DemoAccount) -> Result<DemoSeedOutcome, DemoSeedError> {
        if self.users.find_by_email(&account.email).await?.is_some() {
            return Ok(DemoSeedOutcome::AlreadyPresent);
        }

        let now = self.clock.utc();
        let birth_date = CalendarDay::parse_iso(DEMO_BIRTH_DATE)
            .map_err(|err| DemoSeedError::InvalidFixture(err.to_string()))?;
        let code = VerificationCode::parse("000000")
            .map_err(|err| DemoSeedError::InvalidFixture(err.to_string()))?;
        let draft = NewUser {
            display_name: account.display_name.clone(),
            birth_date,
            email: account.email.clone(),
            password_hash: self.hasher.hash(&account.password).await?,
            verification: PendingVerification { code, sent_at: now },
        };

        let created = match self.users.create(&draft).await {
            Ok(user) => user,
            Err(UserPersistenceError::DuplicateEmail { .. }) => {
                return Ok(DemoSeedOutcome::AlreadyPresent);
            }
            Err(err) => return Err(err.into()),
        };
        let user = self
            .users
            .activate(created.id())
            .await?
            .ok_or(DemoSeedError::NotActivated)?;

        let today = CalendarDay::from_timestamp(now);
        let mut written = 0;
        for (offset, scores) in (0..DEMO_HISTORY_DAYS).rev().zip(DEMO_SCORES) {
            let day = today.minus_days(offset);
            self.check_ins
                .upsert_for_day(user.id(), day, demo_scores(scores)?, None)
                .await?;
            written += 1;
        }

        Ok(DemoSeedOutcome::Created {
            user_id: user.id(),
            check_ins: written,
        })
    }
}

fn demo_scores(
    (energy, focus, emotional_balance, sleep_quality): (i16, i16, i16, i16),
) -> Result<CheckInScores, DemoSeedError> {
    let score = |value| {
        Score::new(value).map_err(|err| DemoSeedError::InvalidFixture(err.to_string()))
    };
    Ok(CheckInScores {
        energy: score(energy)?,
        focus: score(focus)?,
        emotional_balance: score(emotional_balance)?,
        sleep_quality: score(sleep_quality)?,
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{MockCheckInRepository, MockPasswordHasher, MockUserRepository};
    use crate::domain::service_test_helpers::{
        active_user, check_in, fixture_clock, fixture_timestamp, fixture_today, pending_user,
    };
    use crate::domain::{PasswordHash, SavedCheckIn, UpsertOutcome};

    #[fixture]
    fn account() -> DemoAccount {
        DemoAccount {
            email: EmailAddress::new("ana@example.com").expect("email"),
            display_name: DisplayName::new("Ana").expect("name"),
            password: Zeroizing::new("demo-password".to_owned()),
        }
    }

    fn seeder(
        users: MockUserRepository,
        check_ins: MockCheckInRepository,
        hasher: MockPasswordHasher,
    ) -> DemoAccountSeeder<MockUserRepository, MockCheckInRepository, MockPasswordHasher> {
        DemoAccountSeeder::new(
            Arc::new(users),
            Arc::new(check_ins),
            Arc::new(hasher),
            fixture_clock(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn existing_account_is_left_alone(account: DemoAccount) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(|_| Ok(Some(active_user())));

        let outcome = seeder(users, MockCheckInRepository::new(), MockPasswordHasher::new())
            .seed(&account)
            .await
            .expect("seed");
        assert_eq!(outcome, DemoSeedOutcome::AlreadyPresent);
    }

    #[rstest]
    #[tokio::test]
    async fn new_account_is_activated_with_history(account: DemoAccount) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .return_once(|_| Ok(pending_user(fixture_timestamp())));
        users
            .expect_activate()
            .times(1)
            .return_once(|_| Ok(Some(active_user())));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("$argon2id$demo")));
        let mut check_ins = MockCheckInRepository::new();
        let today = fixture_today();
        check_ins
            .expect_upsert_for_day()
            .withf(move |_, day, _, _| *day <= today && *day > today.minus_days(DEMO_HISTORY_DAYS))
            .times(DEMO_HISTORY_DAYS as usize)
            .returning(|_, day, _, _| {
                Ok(SavedCheckIn {
                    check_in: check_in(1, day, 5),
                    outcome: UpsertOutcome::Created,
                })
            });

        let outcome = seeder(users, check_ins, hasher)
            .seed(&account)
            .await
            .expect("seed");
        assert!(matches!(
            outcome,
            DemoSeedOutcome::Created { check_ins: 14, .. }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn racing_instance_counts_as_present(account: DemoAccount) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        users
            .expect_create()
            .return_once(|_| Err(UserPersistenceError::duplicate_email("ana@example.com")));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .return_once(|_| Ok(PasswordHash::new("$argon2id$demo")));

        let outcome = seeder(users, MockCheckInRepository::new(), hasher)
            .seed(&account)
            .await
            .expect("seed");
        assert_eq!(outcome, DemoSeedOutcome::AlreadyPresent);
    }

    #[rstest]
    fn demo_scores_are_in_range() {
        for sample in DEMO_SCORES {
            assert!(demo_scores(sample).is_ok());
        }
    }
}
