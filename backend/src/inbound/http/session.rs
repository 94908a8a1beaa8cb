//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or requiring an
//! administrator identity. The cookie payload carries only the admin's user
//! id; the cookie itself is signed by the session middleware, so forging a
//! session requires the server-held key.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User, UserId};

use super::state::HttpState;

pub(crate) const ADMIN_ID_KEY: &str = "admin_user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated administrator's id in the session cookie.
    pub fn persist_admin(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(ADMIN_ID_KEY, user_id.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current admin id from the session, if present.
    pub fn admin_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(ADMIN_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid admin id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Drop all session state, ending the admin session.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Require a live administrator session or fail.
    ///
    /// The session id is re-validated against the user repository on every
    /// privileged request: a missing session maps to 401, a session whose
    /// user has disappeared or lost the admin flag maps to 403.
    pub async fn require_admin(&self, state: &HttpState) -> Result<User, Error> {
        let id = self
            .admin_id()?
            .ok_or_else(|| Error::unauthorized("admin login required"))?;
        let user = state.users.find_by_id(&id).await.map_err(Error::from)?;
        match user {
            Some(user) if user.is_admin => Ok(user),
            _ => {
                self.clear();
                Err(Error::forbidden("administrator access required"))
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
