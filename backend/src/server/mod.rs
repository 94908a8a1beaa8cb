//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{admin, feedback, pages, users};
use backend::outbound::memory::{InMemoryFeedbackRepository, InMemoryUserRepository};
use backend::outbound::password::BcryptPasswordHasher;
use backend::outbound::store::{
    StoreClient, StoreFeedbackRepository, StoreUserRepository, declared_schema,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build handler state from configuration.
///
/// Uses store-backed repositories when store settings are present, otherwise
/// falls back to the in-memory implementations. The client handle is also
/// returned so the caller can upload the schema before serving traffic.
fn build_state(config: &ServerConfig) -> std::io::Result<(HttpState, Option<Arc<StoreClient>>)> {
    let passwords = Arc::new(BcryptPasswordHasher::new());
    match &config.store {
        Some(store_config) => {
            let client = Arc::new(
                StoreClient::new(store_config.clone())
                    .map_err(|err| std::io::Error::other(format!("store client: {err}")))?,
            );
            info!(base_url = %store_config.base_url, "using the external document store");
            let state = HttpState::new(
                Arc::new(StoreUserRepository::new(client.clone())),
                Arc::new(StoreFeedbackRepository::new(client.clone())),
                passwords,
            );
            Ok((state, Some(client)))
        }
        None => {
            warn!("no store configured; records are kept in memory and lost on restart");
            let state = HttpState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryFeedbackRepository::new()),
                passwords,
            );
            Ok((state, None))
        }
    }
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("admin_session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .build()
}

/// Wire repositories, upload the schema, and bind the HTTP server.
///
/// Returns the unstarted server alongside the health state so the caller
/// can mark readiness once it decides to serve traffic.
pub async fn create_server(
    config: ServerConfig,
) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let (state, store_client) = build_state(&config)?;
    if let Some(client) = &store_client {
        client
            .ensure_schema(&declared_schema())
            .await
            .map_err(|err| std::io::Error::other(format!("schema upload failed: {err}")))?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        let api = web::scope("/api")
            .wrap(session_middleware(key.clone(), cookie_secure, same_site))
            .service(users::register)
            .service(admin::setup)
            .service(admin::login)
            .service(admin::logout)
            .service(feedback::submit)
            .service(feedback::list)
            .service(feedback::update)
            .service(feedback::remove);

        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(api)
            .service(pages::home)
            .service(pages::submit_form)
            .service(pages::admin_dashboard)
            .service(pages::admin_setup_form)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run();

    Ok((server, health_state))
}
