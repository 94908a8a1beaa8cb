//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O. The bundle is
//! constructed once at startup and injected; there is no process-wide
//! singleton store client.

use std::sync::Arc;

use crate::domain::ports::{FeedbackRepository, PasswordHasher, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub passwords: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Bundle the port implementations handlers depend on.
    pub fn new(
        users: Arc<dyn UserRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        passwords: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            feedback,
            passwords,
        }
    }
}
