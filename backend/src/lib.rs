//! Feedback collection backend.
//!
//! End users submit rated comments through a public form; administrators
//! review, respond to, and resolve them from a dashboard. Persistence is
//! delegated to an external document store behind typed repository ports,
//! with an in-memory fallback for tests and store-less development.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::trace::Trace;
