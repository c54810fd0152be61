//! Cookie-carried session tokens.
//!
//! The session cookie holds a signed token issued by the
//! [`SessionTokenCodec`](crate::domain::ports::SessionTokenCodec) in
//! [`HttpState`]. Nothing is stored server-side: a token that fails
//! verification (tampered, expired, or signed with another secret) is
//! treated exactly like a missing cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::ports::{SessionIdentity, SessionToken};
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "sentinela-session";

/// Flags applied to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: i64,
}

impl SessionCookieSettings {
    /// Cookie carrying `token`.
    pub fn session_cookie(&self, token: &SessionToken) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE_NAME, token.value.clone())
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(CookieDuration::seconds(self.max_age_secs))
            .finish()
    }

    /// Expired cookie instructing the browser to drop the session.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Verified session identity for the current request, if any.
#[derive(Debug, Clone)]
pub struct SessionContext(Option<SessionIdentity>);

impl SessionContext {
    pub fn new(identity: Option<SessionIdentity>) -> Self {
        Self(identity)
    }

    /// Identity from a valid session cookie.
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.0.as_ref()
    }

    /// Require a signed-in user or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.0
            .as_ref()
            .map(|identity| identity.user_id)
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            error!("HttpState missing from app data; session cannot be verified");
            return ready(Err(Error::internal("session verification unavailable").into()));
        };
        let identity = req.cookie(SESSION_COOKIE_NAME).and_then(|cookie| {
            match state.sessions.verify(cookie.value()) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    debug!(error = %err, "ignoring unverifiable session cookie");
                    None
                }
            }
        });
        ready(Ok(Self(identity)))
    }
}
