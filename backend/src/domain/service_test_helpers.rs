//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccountStatus, CalendarDay, CheckIn, CheckInDraft, CheckInId, CheckInScores, DisplayName,
    EmailAddress, PasswordHash, PendingVerification, Score, User, UserDraft, UserId,
    VerificationCode,
};

pub(crate) const FIXTURE_CODE: &str = "482913";

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_today() -> CalendarDay {
    CalendarDay::from_timestamp(fixture_timestamp())
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    clock_at(fixture_timestamp())
}

pub(crate) fn user_id() -> UserId {
    UserId::new(42).expect("fixture user id")
}

pub(crate) fn pending_user(sent_at: DateTime<Utc>) -> User {
    build_user(
        AccountStatus::PendingVerification,
        Some(PendingVerification {
            code: VerificationCode::parse(FIXTURE_CODE).expect("fixture code"),
            sent_at,
        }),
    )
}

pub(crate) fn active_user() -> User {
    build_user(AccountStatus::Active, None)
}

fn build_user(status: AccountStatus, pending: Option<PendingVerification>) -> User {
    User::new(UserDraft {
        id: user_id(),
        display_name: DisplayName::new("Ana").expect("display name"),
        birth_date: CalendarDay::parse_iso("1990-06-15").expect("birth date"),
        email: EmailAddress::new("ana@example.com").expect("email"),
        password_hash: PasswordHash::new("$argon2id$fixture"),
        status,
        pending_verification: pending,
        created_at: fixture_timestamp(),
    })
    .expect("fixture user")
}

pub(crate) fn check_in(id: i64, day: CalendarDay, value: i16) -> CheckIn {
    let score = Score::new(value).expect("score in range");
    CheckIn::new(CheckInDraft {
        id: CheckInId::new(id),
        user_id: user_id(),
        day,
        scores: CheckInScores {
            energy: score,
            focus: score,
            emotional_balance: score,
            sleep_quality: score,
        },
        notes: None,
        created_at: day.start(),
    })
}
