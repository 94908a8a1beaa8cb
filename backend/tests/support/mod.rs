//! Shared application builder for the integration suites.

use actix_web::{App, web};

use backend::Trace;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{admin, feedback, users};
use backend::test_support::test_session_middleware;

/// The full API surface wired the way the server binary wires it, against
/// injected (in-memory) repositories.
pub fn api_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .wrap(test_session_middleware())
        .service(users::register)
        .service(admin::setup)
        .service(admin::login)
        .service(admin::logout)
        .service(feedback::submit)
        .service(feedback::list)
        .service(feedback::update)
        .service(feedback::remove);

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api)
}
