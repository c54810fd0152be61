//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};

use crate::domain::ports::{
    MockAccountCommand, MockCheckInCommand, MockCheckInQuery, MockDashboardQuery,
    MockSessionTokenCodec, MockUserProfileQuery, SessionIdentity, SessionTokenError,
};
use crate::domain::{DisplayName, EmailAddress, UserId};
use crate::inbound::http::session::{SESSION_COOKIE_NAME, SessionCookieSettings};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token value the [`signed_in_codec`] accepts.
pub const VALID_TOKEN: &str = "valid-session-token";

/// Cookie flags used by handler tests: not `Secure`, so plain HTTP works.
pub fn cookie_settings() -> SessionCookieSettings {
    SessionCookieSettings {
        secure: false,
        same_site: SameSite::Lax,
        max_age_secs: 7 * 24 * 60 * 60,
    }
}

pub fn session_identity() -> SessionIdentity {
    SessionIdentity {
        user_id: UserId::new(42).expect("fixture user id"),
        email: EmailAddress::new("ana@example.com").expect("fixture email"),
        display_name: DisplayName::new("Ana").expect("fixture name"),
    }
}

/// Codec accepting only [`VALID_TOKEN`].
pub fn signed_in_codec() -> MockSessionTokenCodec {
    let mut codec = MockSessionTokenCodec::new();
    codec.expect_verify().returning(|token| {
        if token == VALID_TOKEN {
            Ok(session_identity())
        } else {
            Err(SessionTokenError::verification_failed())
        }
    });
    codec
}

/// Session cookie carrying [`VALID_TOKEN`].
pub fn session_cookie() -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE_NAME, VALID_TOKEN)
}

/// Mock ports with no expectations; tests set the ones they need.
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub profile: MockUserProfileQuery,
    pub check_ins: MockCheckInCommand,
    pub check_ins_query: MockCheckInQuery,
    pub dashboard: MockDashboardQuery,
    pub sessions: MockSessionTokenCodec,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            accounts: MockAccountCommand::new(),
            profile: MockUserProfileQuery::new(),
            check_ins: MockCheckInCommand::new(),
            check_ins_query: MockCheckInQuery::new(),
            dashboard: MockDashboardQuery::new(),
            sessions: signed_in_codec(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(self.accounts),
                profile: Arc::new(self.profile),
                check_ins: Arc::new(self.check_ins),
                check_ins_query: Arc::new(self.check_ins_query),
                dashboard: Arc::new(self.dashboard),
                sessions: Arc::new(self.sessions),
            },
            cookie_settings(),
        )
    }
}

/// State whose only configured port is `sessions`.
pub fn state_with_sessions(sessions: MockSessionTokenCodec) -> HttpState {
    MockPorts {
        sessions,
        ..MockPorts::default()
    }
    .into_state()
}
