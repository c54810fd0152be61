//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register
//! POST /api/v1/auth/register/resend
//! POST /api/v1/auth/register/verify
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! GET /api/v1/me
//! ```
//!
//! Verification and login open a session by setting the session cookie;
//! logout expires it.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::LoginCredentials;
use crate::domain::ports::{AuthenticatedSession, VerifyAccountRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts_dto::{
    LoginRequest, ProfileResponse, RegisterRequest, RegistrationReceiptResponse, ResendRequest,
    SessionResponse, VerifyRequest,
};
use crate::inbound::http::cache_control::{no_store_header, private_no_cache_header};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{SessionContext, SessionCookieSettings};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

fn session_response(
    cookies: &SessionCookieSettings,
    session: &AuthenticatedSession,
) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies.session_cookie(&session.token))
        .insert_header(no_store_header())
        .json(SessionResponse::from(session))
}

/// Create a pending account and email its verification code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, code sent", body = RegistrationReceiptResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Mail relay unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let receipt = state.accounts.register(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created()
        .insert_header(no_store_header())
        .json(RegistrationReceiptResponse::from(receipt)))
}

/// Send a fresh verification code to a pending account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/resend",
    request_body = ResendRequest,
    responses(
        (status = 200, description = "Code sent", body = RegistrationReceiptResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No pending account for this email", body = ErrorSchema),
        (status = 409, description = "Account already verified", body = ErrorSchema),
        (status = 429, description = "Resend requested too soon", body = ErrorSchema,
            headers(("Retry-After" = u64, description = "Seconds until a resend is accepted"))),
        (status = 503, description = "Mail relay unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resendVerificationCode",
    security([])
)]
#[post("/auth/register/resend")]
pub async fn resend_code(
    state: web::Data<HttpState>,
    payload: web::Json<ResendRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email, FieldName::new("email"))?;
    let receipt = state.accounts.resend_code(&email).await?;
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(RegistrationReceiptResponse::from(receipt)))
}

/// Activate a pending account and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Account verified", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid or expired code", body = ErrorSchema),
        (status = 404, description = "No pending account for this email", body = ErrorSchema),
        (status = 409, description = "Account already verified", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "verifyAccount",
    security([])
)]
#[post("/auth/register/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<HttpResponse> {
    let VerifyRequest { email, code } = payload.into_inner();
    let email = parse_email(&email, FieldName::new("email"))?;
    let session = state
        .accounts
        .verify(VerifyAccountRequest { email, code })
        .await?;
    Ok(session_response(&state.cookies, &session))
}

/// Authenticate an active account and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Account not verified", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.login(credentials).await?;
    Ok(session_response(&state.cookies, &session))
}

/// Expire the session cookie. Succeeds whether or not a session was open.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared",
            headers(("Set-Cookie" = String, description = "Expired session cookie")))
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(state.cookies.removal_cookie())
        .insert_header(no_store_header())
        .finish()
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.profile.fetch_profile(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse::from(profile)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
