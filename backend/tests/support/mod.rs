//! In-memory adapters and app wiring shared by the HTTP flow tests.
//!
//! The doubles stand in for the Diesel repositories, Argon2, and the mail
//! relay so a whole request flow runs through the real services and the JWT
//! codec without a database.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use sentinela::Trace;
use sentinela::domain::ports::{
    CheckInRepository, CheckInRepositoryError, MailerError, PasswordHasher, PasswordHasherError,
    UserPersistenceError, UserRepository, VerificationEmail, VerificationMailer,
};
use sentinela::domain::{
    AccountService, AccountServiceDeps, AccountStatus, CalendarDay, CheckIn, CheckInDraft,
    CheckInId, CheckInNotes, CheckInScores, CheckInService, DashboardService, EmailAddress,
    NewUser, PasswordHash, PendingVerification, SavedCheckIn, UpsertOutcome, User, UserDraft,
    UserId, VerificationPolicy,
};
use sentinela::inbound::http::accounts::{
    current_user, login, logout, register, resend_code, verify,
};
use sentinela::inbound::http::check_ins::{
    check_in_for_day, list_check_ins, submission_days, submit_check_in, today_check_in,
};
use sentinela::inbound::http::dashboard::{analytics, summary};
use sentinela::inbound::http::session::{SESSION_COOKIE_NAME, SessionCookieSettings};
use sentinela::inbound::http::state::{HttpState, HttpStatePorts};
use sentinela::inbound::http::validation::json_config;
use sentinela::outbound::security::JwtSessionCodec;

const SIGNING_SECRET: &[u8] = b"integration-test-signing-secret-with-enough-bytes";

/// 2026-02-24T10:30:00Z, a Tuesday.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid start time")
}

pub fn day(value: &str) -> CalendarDay {
    CalendarDay::parse_iso(value).expect("fixture date")
}

/// Clock the tests can move forward.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.0.lock().expect("clock mutex");
        *guard += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// Accounts kept in a vector; ids are assigned from 1.
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    clock: Arc<MutableClock>,
}

impl InMemoryUsers {
    pub fn new(clock: Arc<MutableClock>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn rebuild(
        user: &User,
        status: AccountStatus,
        pending_verification: Option<PendingVerification>,
    ) -> User {
        User::new(UserDraft {
            id: user.id(),
            display_name: user.display_name().clone(),
            birth_date: user.birth_date(),
            email: user.email().clone(),
            password_hash: user.password_hash().clone(),
            status,
            pending_verification,
            created_at: user.created_at(),
        })
        .expect("consistent stored user")
    }

    fn replace_pending(
        &self,
        id: UserId,
        update: impl FnOnce(&User) -> User,
    ) -> Option<User> {
        let mut rows = self.rows.lock().expect("users mutex");
        let slot = rows
            .iter_mut()
            .find(|user| user.id() == id && !user.is_active())?;
        *slot = update(slot);
        Some(slot.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut rows = self.rows.lock().expect("users mutex");
        if rows.iter().any(|row| row.email() == &user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let next_id = i64::try_from(rows.len()).expect("row count fits") + 1;
        let stored = User::new(UserDraft {
            id: UserId::new(next_id).expect("positive id"),
            display_name: user.display_name.clone(),
            birth_date: user.birth_date,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            status: AccountStatus::PendingVerification,
            pending_verification: Some(user.verification.clone()),
            created_at: self.clock.utc(),
        })
        .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let rows = self.rows.lock().expect("users mutex");
        Ok(rows.iter().find(|user| user.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let rows = self.rows.lock().expect("users mutex");
        Ok(rows.iter().find(|user| user.id() == id).cloned())
    }

    async fn refresh_verification(
        &self,
        id: UserId,
        verification: &PendingVerification,
    ) -> Result<bool, UserPersistenceError> {
        let updated = self.replace_pending(id, |user| {
            Self::rebuild(
                user,
                AccountStatus::PendingVerification,
                Some(verification.clone()),
            )
        });
        Ok(updated.is_some())
    }

    async fn activate(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.replace_pending(id, |user| Self::rebuild(user, AccountStatus::Active, None)))
    }
}

/// Check-ins keyed by `(user, day)` with storage-assigned ids.
pub struct InMemoryCheckIns {
    rows: Mutex<Vec<CheckIn>>,
    clock: Arc<MutableClock>,
}

impl InMemoryCheckIns {
    pub fn new(clock: Arc<MutableClock>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn newest_first(mut rows: Vec<CheckIn>) -> Vec<CheckIn> {
        rows.sort_by(|a, b| b.day().cmp(&a.day()).then(b.id().cmp(&a.id())));
        rows
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckIns {
    async fn find_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
    ) -> Result<Option<CheckIn>, CheckInRepositoryError> {
        let rows = self.rows.lock().expect("check-ins mutex");
        Ok(rows
            .iter()
            .find(|row| row.user_id() == user_id && row.day() == day)
            .cloned())
    }

    async fn upsert_for_day(
        &self,
        user_id: UserId,
        day: CalendarDay,
        scores: CheckInScores,
        notes: Option<CheckInNotes>,
    ) -> Result<SavedCheckIn, CheckInRepositoryError> {
        let mut rows = self.rows.lock().expect("check-ins mutex");
        let existing = rows
            .iter()
            .position(|row| row.user_id() == user_id && row.day() == day);
        let (id, created_at, outcome) = match existing {
            Some(index) => {
                let previous = &rows[index];
                (previous.id(), previous.created_at(), UpsertOutcome::Updated)
            }
            None => {
                let next_id = i64::try_from(rows.len()).expect("row count fits") + 1;
                (
                    CheckInId::new(next_id),
                    self.clock.utc(),
                    UpsertOutcome::Created,
                )
            }
        };
        let check_in = CheckIn::new(CheckInDraft {
            id,
            user_id,
            day,
            scores,
            notes,
            created_at,
        });
        match existing {
            Some(index) => rows[index] = check_in.clone(),
            None => rows.push(check_in.clone()),
        }
        Ok(SavedCheckIn { check_in, outcome })
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let rows = self.rows.lock().expect("check-ins mutex");
        Ok(Self::newest_first(
            rows.iter()
                .filter(|row| row.user_id() == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_since(
        &self,
        user_id: UserId,
        threshold: CalendarDay,
    ) -> Result<Vec<CheckIn>, CheckInRepositoryError> {
        let rows = self.rows.lock().expect("check-ins mutex");
        Ok(Self::newest_first(
            rows.iter()
                .filter(|row| row.user_id() == user_id && row.day() >= threshold)
                .cloned()
                .collect(),
        ))
    }
}

/// Reversible "hash" so flows skip Argon2's cost.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hash.as_str().strip_prefix("plain:") == Some(password))
    }
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<VerificationEmail>>,
}

impl CapturingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer mutex").len()
    }

    /// Code from the most recent message to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("mailer mutex")
            .iter()
            .rev()
            .find(|message| message.to.as_ref() == email)
            .map(|message| message.code.as_str().to_owned())
    }
}

#[async_trait]
impl VerificationMailer for CapturingMailer {
    async fn send(&self, email: &VerificationEmail) -> Result<(), MailerError> {
        self.sent.lock().expect("mailer mutex").push(email.clone());
        Ok(())
    }
}

/// Real services over the in-memory adapters.
pub struct Harness {
    pub clock: Arc<MutableClock>,
    pub mailer: Arc<CapturingMailer>,
    pub check_in_repo: Arc<InMemoryCheckIns>,
    pub state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(start_time()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let mailer = Arc::new(CapturingMailer::default());
        let check_in_repo = Arc::new(InMemoryCheckIns::new(Arc::clone(&clock)));
        let tokens = Arc::new(JwtSessionCodec::new(
            SIGNING_SECRET,
            TimeDelta::days(7),
            Arc::clone(&dyn_clock),
        ));
        let accounts = Arc::new(AccountService::new(AccountServiceDeps {
            users: Arc::new(InMemoryUsers::new(Arc::clone(&clock))),
            hasher: Arc::new(PlainTextHasher),
            mailer: Arc::clone(&mailer),
            tokens: Arc::clone(&tokens),
            clock: Arc::clone(&dyn_clock),
            policy: VerificationPolicy::default(),
        }));
        let check_ins = Arc::new(CheckInService::new(
            Arc::clone(&check_in_repo),
            Arc::clone(&dyn_clock),
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&check_in_repo),
            dyn_clock,
        ));
        let state = HttpState::new(
            HttpStatePorts {
                accounts: accounts.clone(),
                profile: accounts,
                check_ins: check_ins.clone(),
                check_ins_query: check_ins,
                dashboard,
                sessions: tokens,
            },
            SessionCookieSettings {
                secure: false,
                same_site: SameSite::Lax,
                max_age_secs: TimeDelta::days(7).num_seconds(),
            },
        );
        Self {
            clock,
            mailer,
            check_in_repo,
            state,
        }
    }
}

/// Initialise the `/api/v1` routes over `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let api = web::scope("/api/v1")
        .service(register)
        .service(resend_code)
        .service(verify)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(submit_check_in)
        .service(list_check_ins)
        .service(submission_days)
        .service(today_check_in)
        .service(check_in_for_day)
        .service(summary)
        .service(analytics);
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(Trace)
            .service(api),
    )
    .await
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Register and verify `email`, returning the session cookie.
pub async fn signed_up<S, B>(app: &S, harness: &Harness, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "name": "Ana",
                "birthDate": "1990-06-15",
                "email": email,
                "password": "correct horse",
            }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "register failed: {}", res.status());
    let code = harness.mailer.last_code_for(email).expect("code mailed");
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register/verify")
            .set_json(serde_json::json!({ "email": email, "code": code }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "verify failed: {}", res.status());
    session_cookie(&res).expect("session cookie")
}
