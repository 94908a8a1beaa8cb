//! Domain primitives and aggregates.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod auth;
pub mod error;
pub mod feedback;
pub mod ports;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feedback::{
    Category, Feedback, FeedbackFilter, FeedbackId, FeedbackPatch, FeedbackStatus,
    FeedbackValidationError, NewFeedback, Rating,
};
pub use self::user::{EmailAddress, NewUser, User, UserId, UserValidationError};
