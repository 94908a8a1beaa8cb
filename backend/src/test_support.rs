//! Test utilities for the backend crate.
//!
//! Shared helpers for both unit tests (in `src/`) and integration tests
//! (in `tests/`, through the `test-support` feature).

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use serde_json::{Value, json};

use crate::domain::{EmailAddress, NewUser, User};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryFeedbackRepository, InMemoryUserRepository};
use crate::outbound::password::BcryptPasswordHasher;

/// Session middleware matching production settings apart from the ephemeral
/// key and the secure flag (tests speak plain HTTP).
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("admin_session".into())
        .cookie_path("/".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Handler state backed by the in-memory repositories and a fast hasher.
pub fn memory_state() -> HttpState {
    HttpState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryFeedbackRepository::new()),
        Arc::new(BcryptPasswordHasher::with_cost(4)),
    )
}

/// Insert a user directly through the repository, bypassing the HTTP layer.
pub async fn seed_user(state: &HttpState, email: &str, password: &str, is_admin: bool) -> User {
    let hash = state
        .passwords
        .hash(password)
        .await
        .expect("hash seed password");
    let email = EmailAddress::new(email).expect("valid seed email");
    let user = NewUser::new(email, "Seeded User", hash, is_admin).expect("valid seed user");
    state.users.insert(user).await.expect("insert seed user")
}

/// JSON body for registration and admin setup requests.
pub fn register_body(email: &str, name: &str, password: &str) -> Value {
    json!({ "email": email, "name": name, "password": password })
}

/// JSON body for admin login requests.
pub fn login_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

/// JSON body for feedback submissions; the email is derived from the name.
pub fn feedback_body(
    user_id: &str,
    user_name: &str,
    rating: i64,
    comment: &str,
    category: Option<&str>,
) -> Value {
    let mut body = json!({
        "userId": user_id,
        "userName": user_name,
        "userEmail": format!("{}@example.com", user_name.to_lowercase()),
        "rating": rating,
        "comment": comment,
    });
    if let Some(category) = category {
        body["category"] = json!(category);
    }
    body
}
