//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the external document store and the password hashing primitive). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use super::error::Error;
use super::feedback::{Feedback, FeedbackFilter, FeedbackId, FeedbackPatch, NewFeedback};
use super::user::{EmailAddress, NewUser, User, UserId};

/// Failures surfaced by the store-backed repository adapters.
///
/// Mirrors the external store's entire failure surface: uniqueness
/// conflicts, schema validation rejections, unknown ids, and transport or
/// service faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A uniqueness constraint was violated.
    #[error("duplicate value for {constraint}")]
    Conflict { constraint: String },
    /// The store rejected the document against its declared schema.
    #[error("store rejected the document: {message}")]
    Invalid { message: String },
    /// The id does not name a stored document.
    #[error("document does not exist")]
    NotFound,
    /// The store could not be reached.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// Catch-all for failures the store does not classify.
    #[error("store request failed: {message}")]
    Backend { message: String },
}

impl PersistenceError {
    /// Helper for uniqueness conflicts.
    pub fn conflict(constraint: impl Into<String>) -> Self {
        Self::Conflict {
            constraint: constraint.into(),
        }
    }

    /// Helper for schema validation rejections.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for unclassified store failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::Conflict { constraint } => {
                Error::conflict(format!("duplicate value for {constraint}"))
                    .with_details(json!({ "constraint": constraint }))
            }
            PersistenceError::Invalid { message } => Error::invalid_request(message),
            PersistenceError::NotFound => Error::not_found("document does not exist"),
            PersistenceError::Connection { message } | PersistenceError::Backend { message } => {
                Error::internal(message)
            }
        }
    }
}

/// Failures surfaced by the password hashing adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Producing a hash failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// Comparing a password against a stored hash failed.
    #[error("password verification failed: {message}")]
    Verify { message: String },
}

impl PasswordHashError {
    /// Helper for hashing failures.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Helper for verification failures.
    pub fn verify(message: impl Into<String>) -> Self {
        Self::Verify {
            message: message.into(),
        }
    }
}

impl From<PasswordHashError> for Error {
    fn from(value: PasswordHashError) -> Self {
        Error::internal(value.to_string())
    }
}

/// Persistence port for the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, failing with [`PersistenceError::Conflict`] when the
    /// email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User, PersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, PersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// Whether any record has the admin flag set.
    async fn admin_exists(&self) -> Result<bool, PersistenceError>;
}

/// Persistence port for the `feedback` collection.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a feedback record with status `open` and no response.
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, PersistenceError>;

    /// Exact-match query, sorted newest-first by creation time.
    async fn find(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, PersistenceError>;

    /// Fetch a single record by identifier.
    async fn find_by_id(&self, id: &FeedbackId) -> Result<Option<Feedback>, PersistenceError>;

    /// Apply a partial update; fields absent from the patch are untouched.
    /// Fails with [`PersistenceError::NotFound`] for unknown ids.
    async fn update(&self, id: &FeedbackId, patch: &FeedbackPatch)
        -> Result<(), PersistenceError>;

    /// Remove a record permanently. Fails with [`PersistenceError::NotFound`]
    /// for unknown ids.
    async fn delete(&self, id: &FeedbackId) -> Result<(), PersistenceError>;
}

/// Hashing port for password storage and verification.
///
/// Hashing is CPU-bound; adapters run it on a blocking thread.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for storage.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Verify a password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
