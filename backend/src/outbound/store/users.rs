//! Store-backed user repository adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::client::{Query, StoreClient};

const COLLECTION: &str = "users";

/// [`UserRepository`] implementation forwarding to the external store.
pub struct StoreUserRepository {
    client: Arc<StoreClient>,
}

impl StoreUserRepository {
    /// Wrap a shared store client.
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewUserDocument<'a> {
    email: &'a str,
    name: &'a str,
    is_admin: bool,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    is_admin: bool,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserDocument> for User {
    type Error = PersistenceError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let id = UserId::new(doc.id)
            .map_err(|err| PersistenceError::backend(format!("invalid stored user id: {err}")))?;
        let email = EmailAddress::new(doc.email).map_err(|err| {
            PersistenceError::backend(format!("invalid stored user email: {err}"))
        })?;
        Ok(Self {
            id,
            email,
            name: doc.name,
            is_admin: doc.is_admin,
            password_hash: doc.password,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, PersistenceError> {
        let document = NewUserDocument {
            email: user.email().as_str(),
            name: user.name(),
            is_admin: user.is_admin(),
            password: user.password_hash(),
        };
        let stored: UserDocument = self.client.insert(COLLECTION, &document).await?;
        stored.try_into()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, PersistenceError> {
        let query = Query::new().with_filter("email", email.as_str()).with_limit(1);
        let documents: Vec<UserDocument> = self.client.find(COLLECTION, &query).await?;
        documents.into_iter().next().map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let query = Query::new().with_filter("id", id.as_str()).with_limit(1);
        let documents: Vec<UserDocument> = self.client.find(COLLECTION, &query).await?;
        documents.into_iter().next().map(User::try_from).transpose()
    }

    async fn admin_exists(&self) -> Result<bool, PersistenceError> {
        let query = Query::new().with_filter("isAdmin", true).with_limit(1);
        let documents: Vec<UserDocument> = self.client.find(COLLECTION, &query).await?;
        Ok(!documents.is_empty())
    }
}
