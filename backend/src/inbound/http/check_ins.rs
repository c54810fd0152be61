//! Check-in HTTP handlers.
//!
//! ```text
//! POST /api/v1/check-ins
//! GET /api/v1/check-ins
//! GET /api/v1/check-ins/days
//! GET /api/v1/check-ins/today
//! GET /api/v1/check-ins/{date}
//! ```
//!
//! The fixed `days` and `today` segments are registered ahead of `{date}` so
//! they never reach the date parser.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::ports::SubmitCheckInRequest;
use crate::domain::{CalendarDay, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::check_ins_dto::{
    CheckInRequest, CheckInResponse, SubmissionDayResponse, SubmitCheckInResponseBody,
    TodayResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_day};

const DATE_FIELD: FieldName = FieldName::new("date");

#[derive(Debug, Deserialize)]
struct DatePath {
    date: String,
}

fn parse_optional_day(value: Option<&str>) -> Result<Option<CalendarDay>, Error> {
    value.map(|raw| parse_day(raw, DATE_FIELD)).transpose()
}

/// Record or replace the check-in for a day in the submission window.
#[utoipa::path(
    post,
    path = "/api/v1/check-ins",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Check-in created", body = SubmitCheckInResponseBody),
        (status = 200, description = "Existing check-in replaced", body = SubmitCheckInResponseBody),
        (status = 400, description = "Invalid request or day outside the window", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "submitCheckIn",
    security(("SessionCookie" = []))
)]
#[post("/check-ins")]
pub async fn submit_check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CheckInRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let mut payload = payload.into_inner();
    let day = parse_optional_day(payload.date.as_deref())?;
    let notes = payload.take_notes()?;
    let response = state
        .check_ins
        .submit(SubmitCheckInRequest {
            user_id,
            day,
            scores: payload.raw_scores(),
            notes,
        })
        .await?;
    let mut builder = if response.outcome.is_update() {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    Ok(builder
        .insert_header(private_no_cache_header())
        .json(SubmitCheckInResponseBody::from(response)))
}

/// Every check-in of the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/check-ins",
    responses(
        (status = 200, description = "Check-in history", body = [CheckInResponse]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "listCheckIns",
    security(("SessionCookie" = []))
)]
#[get("/check-ins")]
pub async fn list_check_ins(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let records = state.check_ins_query.list(user_id).await?;
    let body: Vec<CheckInResponse> = records.into_iter().map(CheckInResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Days that currently accept a submission, today first.
#[utoipa::path(
    get,
    path = "/api/v1/check-ins/days",
    responses(
        (status = 200, description = "Submission window", body = [SubmissionDayResponse]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "listSubmissionDays",
    security(("SessionCookie" = []))
)]
#[get("/check-ins/days")]
pub async fn submission_days(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let days = state.check_ins_query.submission_days(user_id).await?;
    let body: Vec<SubmissionDayResponse> =
        days.into_iter().map(SubmissionDayResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Today's check-in, or `null`.
#[utoipa::path(
    get,
    path = "/api/v1/check-ins/today",
    responses(
        (status = 200, description = "Today's check-in", body = TodayResponse),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "getTodayCheckIn",
    security(("SessionCookie" = []))
)]
#[get("/check-ins/today")]
pub async fn today_check_in(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let check_in = state.check_ins_query.today(user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(TodayResponse {
            check_in: check_in.map(CheckInResponse::from),
        }))
}

/// The check-in recorded for one day.
#[utoipa::path(
    get,
    path = "/api/v1/check-ins/{date}",
    params(
        ("date" = String, Path, description = "Day as YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Check-in", body = CheckInResponse),
        (status = 400, description = "Malformed date", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No check-in for that day", body = ErrorSchema)
    ),
    tags = ["check-ins"],
    operation_id = "getCheckIn",
    security(("SessionCookie" = []))
)]
#[get("/check-ins/{date}")]
pub async fn check_in_for_day(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DatePath>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let day = parse_day(&path.date, DATE_FIELD)?;
    let check_in = state.check_ins_query.for_day(user_id, day).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(CheckInResponse::from(check_in)))
}

#[cfg(test)]
#[path = "check_ins_tests.rs"]
mod tests;
