//! HTTP inbound adapter exposing the JSON API and the embedded pages.

pub mod admin;
pub mod error;
pub mod feedback;
pub mod health;
pub mod pages;
pub mod session;
pub mod state;
pub mod users;
pub mod validation;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use error::{ApiError, ApiResult};
pub use session::SessionContext;

/// Minimal confirmation body returned by mutating endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
