//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CheckInCommand, CheckInQuery, DashboardQuery, SessionTokenCodec,
    UserProfileQuery,
};
use crate::inbound::http::session::SessionCookieSettings;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub check_ins: Arc<dyn CheckInCommand>,
    pub check_ins_query: Arc<dyn CheckInQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub sessions: Arc<dyn SessionTokenCodec>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub check_ins: Arc<dyn CheckInCommand>,
    pub check_ins_query: Arc<dyn CheckInQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub sessions: Arc<dyn SessionTokenCodec>,
    pub cookies: SessionCookieSettings,
}

impl HttpState {
    /// Construct state from a ports bundle and the session cookie flags.
    pub fn new(ports: HttpStatePorts, cookies: SessionCookieSettings) -> Self {
        let HttpStatePorts {
            accounts,
            profile,
            check_ins,
            check_ins_query,
            dashboard,
            sessions,
        } = ports;
        Self {
            accounts,
            profile,
            check_ins,
            check_ins_query,
            dashboard,
            sessions,
            cookies,
        }
    }
}
