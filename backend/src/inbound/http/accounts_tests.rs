//! Tests for account HTTP handlers.

use actix_web::cookie::{Cookie, time::Duration as CookieDuration};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test};
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{RegistrationReceipt, SessionToken};
use crate::domain::service_test_helpers::{active_user, fixture_timestamp, fixture_today};
use crate::domain::{EmailAddress, Error, UserProfile};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use crate::inbound::http::test_utils::{MockPorts, session_cookie};
use crate::inbound::http::validation::json_config;

fn profile() -> UserProfile {
    active_user()
        .profile(fixture_today())
        .expect("fixture profile")
}

fn receipt() -> RegistrationReceipt {
    let sent_at = fixture_timestamp();
    RegistrationReceipt {
        email: EmailAddress::new("ana@example.com").expect("email"),
        sent_at,
        resend_available_at: sent_at + TimeDelta::seconds(60),
        resend_interval_secs: 60,
    }
}

fn authenticated() -> AuthenticatedSession {
    AuthenticatedSession {
        profile: profile(),
        token: SessionToken {
            value: "issued-token".to_owned(),
            expires_at: fixture_timestamp() + TimeDelta::days(7),
        },
    }
}

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .app_data(json_config())
            .service(register)
            .service(resend_code)
            .service(verify)
            .service(login)
            .service(logout)
            .service(current_user),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

fn response_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

#[actix_web::test]
async fn register_returns_created_receipt() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_register()
        .withf(|form| form.display_name == "Ana" && form.birth_date == "1990-06-15")
        .times(1)
        .returning(|_| Ok(receipt()));

    let response = call(
        ports,
        actix_test::TestRequest::post().uri("/auth/register").set_json(json!({
            "name": "Ana",
            "birthDate": "1990-06-15",
            "email": "ana@example.com",
            "password": "correct horse"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("email"), Some(&json!("ana@example.com")));
    assert_eq!(body.get("resendIntervalSecs"), Some(&json!(60)));
    assert_eq!(
        body.get("resendAvailableAt"),
        Some(&json!("2026-02-24T10:31:00+00:00"))
    );
}

#[actix_web::test]
async fn register_surfaces_duplicate_email_as_conflict() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_register()
        .returning(|_| Err(Error::conflict("an account with this email already exists")));

    let response = call(
        ports,
        actix_test::TestRequest::post().uri("/auth/register").set_json(json!({
            "name": "Ana",
            "birthDate": "1990-06-15",
            "email": "ana@example.com",
            "password": "correct horse"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn register_rejects_missing_fields_before_the_port() {
    let response = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "Ana" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/details/code"), Some(&json!("malformed_body")));
}

#[actix_web::test]
async fn resend_rejects_invalid_email() {
    let response = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/auth/register/resend")
            .set_json(json!({ "email": "nope" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/details/field"), Some(&json!("email")));
}

#[actix_web::test]
async fn resend_inside_cooldown_sets_retry_after() {
    let mut ports = MockPorts::default();
    ports.accounts.expect_resend_code().returning(|_| {
        Err(
            Error::too_many_requests("please wait before requesting another code").with_details(
                json!({
                    "resendAvailableAt": "2026-02-24T10:31:00Z",
                    "retryAfterSecs": 42,
                }),
            ),
        )
    });

    let response = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/register/resend")
            .set_json(json!({ "email": "Ana@Example.com" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("42")
    );
}

#[actix_web::test]
async fn verify_opens_a_session() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_verify()
        .withf(|request| request.email.as_ref() == "ana@example.com" && request.code == "482913")
        .times(1)
        .returning(|_| Ok(authenticated()));

    let response = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/register/verify")
            .set_json(json!({ "email": "ana@example.com", "code": "482913" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response_cookie(&response);
    assert_eq!(cookie.value(), "issued-token");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/user/status"), Some(&json!("active")));
    assert_eq!(body.pointer("/user/displayName"), Some(&json!("Ana")));
}

#[rstest]
#[case(json!({ "email": "nope", "password": "secret" }), "email", "invalid_email")]
#[case(json!({ "email": "ana@example.com", "password": "" }), "password", "empty_password")]
#[actix_web::test]
async fn login_validates_credentials_shape(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let response = call(
        MockPorts::default(),
        actix_test::TestRequest::post().uri("/auth/login").set_json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.pointer("/details/field"), Some(&json!(field)));
    assert_eq!(body.pointer("/details/code"), Some(&json!(code)));
}

#[actix_web::test]
async fn login_sets_session_cookie() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .times(1)
        .returning(|_| Ok(authenticated()));

    let response = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ana@example.com", "password": "secret" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_cookie(&response).value(), "issued-token");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("expiresAt"),
        Some(&json!("2026-03-03T10:30:00+00:00"))
    );
}

#[actix_web::test]
async fn login_rejection_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_login()
        .returning(|_| Err(Error::unauthorized("invalid email or password")));

    let response = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ana@example.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.response().cookies().next().is_none());
}

#[actix_web::test]
async fn logout_expires_the_cookie() {
    let response = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(session_cookie()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response_cookie(&response);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
}

#[actix_web::test]
async fn me_requires_a_session() {
    let response = call(MockPorts::default(), actix_test::TestRequest::get().uri("/me")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_returns_the_profile() {
    let mut ports = MockPorts::default();
    ports
        .profile
        .expect_fetch_profile()
        .withf(|user_id| user_id.get() == 42)
        .times(1)
        .returning(|_| Ok(profile()));

    let response = call(
        ports,
        actix_test::TestRequest::get().uri("/me").cookie(session_cookie()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "id": 42,
            "displayName": "Ana",
            "email": "ana@example.com",
            "birthDate": "1990-06-15",
            "age": 35,
            "status": "active"
        })
    );
}
