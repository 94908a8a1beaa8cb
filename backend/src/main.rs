//! Backend entry-point: configuration from the environment, then serve.

mod server;

use std::env;

use actix_web::cookie::{Key, SameSite};
use backend::outbound::store::StoreConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    match (env::var("STORE_URL"), env::var("STORE_API_KEY")) {
        (Ok(base_url), Ok(api_key)) => {
            config = config.with_store(StoreConfig { base_url, api_key });
        }
        (Ok(_), Err(_)) => {
            return Err(std::io::Error::other(
                "STORE_URL is set but STORE_API_KEY is missing",
            ));
        }
        (Err(_), _) => {}
    }

    let (server, health_state) = server::create_server(config).await?;
    health_state.mark_ready();
    server.await
}

/// Load the session signing key, with a dev-only ephemeral fallback.
fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}
