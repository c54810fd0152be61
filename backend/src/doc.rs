//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response bodies,
//! the domain error schemas from [`crate::inbound::http::schemas`], and the
//! session cookie security scheme.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::accounts_dto::{
    LoginRequest, ProfileResponse, RegisterRequest, RegistrationReceiptResponse, ResendRequest,
    SessionResponse, VerifyRequest,
};
use crate::inbound::http::check_ins_dto::{
    CheckInRequest, CheckInResponse, NoteSectionsResponse, OutcomeResponse, SubmissionDayResponse,
    SubmitCheckInResponseBody, TodayResponse,
};
use crate::inbound::http::dashboard::{
    AlertResponse, AlertTypeResponse, AnalyticsResponse, MetricAveragesResponse, SummaryResponse,
    TrendPointResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session::SESSION_COOKIE_NAME;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Signed session token set by verification or POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Sentinela API",
        description = "Daily wellness check-ins, dashboards, and trend alerts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::resend_code,
        crate::inbound::http::accounts::verify,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::check_ins::submit_check_in,
        crate::inbound::http::check_ins::list_check_ins,
        crate::inbound::http::check_ins::submission_days,
        crate::inbound::http::check_ins::today_check_in,
        crate::inbound::http::check_ins::check_in_for_day,
        crate::inbound::http::dashboard::summary,
        crate::inbound::http::dashboard::analytics,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        ResendRequest,
        VerifyRequest,
        LoginRequest,
        RegistrationReceiptResponse,
        ProfileResponse,
        SessionResponse,
        CheckInRequest,
        CheckInResponse,
        NoteSectionsResponse,
        OutcomeResponse,
        SubmitCheckInResponseBody,
        SubmissionDayResponse,
        TodayResponse,
        MetricAveragesResponse,
        SummaryResponse,
        TrendPointResponse,
        AlertTypeResponse,
        AlertResponse,
        AnalyticsResponse,
    )),
    tags(
        (name = "auth", description = "Registration, verification, and sessions"),
        (name = "users", description = "The signed-in user"),
        (name = "check-ins", description = "Daily wellness check-ins"),
        (name = "dashboard", description = "Summaries, trends, and alerts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
