//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use state_builders::{DatabaseProbe, build_http_state};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::Clock;

use sentinela::Trace;
#[cfg(debug_assertions)]
use sentinela::doc::ApiDoc;
use sentinela::inbound::http::accounts::{
    current_user, login, logout, register, resend_code, verify,
};
use sentinela::inbound::http::check_ins::{
    check_in_for_day, list_check_ins, submission_days, submit_check_in, today_check_in,
};
use sentinela::inbound::http::dashboard::{analytics, summary};
use sentinela::inbound::http::health::{HealthState, live, ready};
use sentinela::inbound::http::state::HttpState;
use sentinela::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Assemble the application: `/api/v1` routes, health probes, trace ids,
/// and Swagger UI in debug builds.
pub(crate) fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Fixed check-in segments precede `{date}`.
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

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is marked once the listener is bound; from then on it also
/// tracks whether the database answers.
///
/// # Errors
/// Propagates [`std::io::Error`] when building state, binding the socket, or
/// starting the server fails.
pub fn create_server(
    health_state: HealthState,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config, clock)?);
    let health_state = web::Data::new(
        health_state.with_probe(Arc::new(DatabaseProbe::new(config.db_pool.clone()))),
    );
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
