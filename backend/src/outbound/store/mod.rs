//! Outbound adapter for the external document store.
//!
//! `client` owns transport, `schema` owns the declared constraints, and the
//! sibling modules adapt the wire documents to the typed repository ports.

pub mod client;
pub mod feedback;
pub mod schema;
pub mod users;

pub use client::{Query, StoreClient, StoreConfig};
pub use feedback::StoreFeedbackRepository;
pub use schema::declared_schema;
pub use users::StoreUserRepository;
