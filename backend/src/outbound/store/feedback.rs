//! Store-backed feedback repository adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{FeedbackRepository, PersistenceError};
use crate::domain::{
    Category, Feedback, FeedbackFilter, FeedbackId, FeedbackPatch, FeedbackStatus, NewFeedback,
    Rating, UserId,
};

use super::client::{Query, StoreClient};

const COLLECTION: &str = "feedback";

/// [`FeedbackRepository`] implementation forwarding to the external store.
pub struct StoreFeedbackRepository {
    client: Arc<StoreClient>,
}

impl StoreFeedbackRepository {
    /// Wrap a shared store client.
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFeedbackDocument<'a> {
    user_id: &'a str,
    user_name: &'a str,
    user_email: &'a str,
    rating: i64,
    comment: &'a str,
    category: Category,
    status: FeedbackStatus,
    admin_response: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackPatchDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<FeedbackStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_response: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackDocument {
    id: String,
    user_id: String,
    user_name: String,
    user_email: String,
    rating: i64,
    comment: String,
    category: Category,
    status: FeedbackStatus,
    #[serde(default)]
    admin_response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FeedbackDocument> for Feedback {
    type Error = PersistenceError;

    fn try_from(doc: FeedbackDocument) -> Result<Self, Self::Error> {
        let id = FeedbackId::new(doc.id).map_err(|err| {
            PersistenceError::backend(format!("invalid stored feedback id: {err}"))
        })?;
        let user_id = UserId::new(doc.user_id).map_err(|err| {
            PersistenceError::backend(format!("invalid stored feedback user id: {err}"))
        })?;
        let rating = Rating::new(doc.rating).map_err(|err| {
            PersistenceError::backend(format!("invalid stored rating: {err}"))
        })?;
        Ok(Self {
            id,
            user_id,
            user_name: doc.user_name,
            user_email: doc.user_email,
            rating,
            comment: doc.comment,
            category: doc.category,
            status: doc.status,
            // The store keeps an empty string until a response is written.
            admin_response: doc.admin_response.filter(|text| !text.is_empty()),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[async_trait]
impl FeedbackRepository for StoreFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, PersistenceError> {
        let document = NewFeedbackDocument {
            user_id: feedback.user_id().as_str(),
            user_name: feedback.user_name(),
            user_email: feedback.user_email(),
            rating: i64::from(feedback.rating().value()),
            comment: feedback.comment(),
            category: feedback.category(),
            status: FeedbackStatus::Open,
            admin_response: "",
        };
        let stored: FeedbackDocument = self.client.insert(COLLECTION, &document).await?;
        stored.try_into()
    }

    async fn find(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, PersistenceError> {
        let mut query = Query::new().sorted_desc("createdAt");
        if let Some(category) = filter.category {
            query = query.with_filter("category", category.as_str());
        }
        if let Some(status) = filter.status {
            query = query.with_filter("status", status.as_str());
        }
        if let Some(limit) = filter.limit {
            query = query.with_limit(limit as u64);
        }
        let documents: Vec<FeedbackDocument> = self.client.find(COLLECTION, &query).await?;
        documents.into_iter().map(Feedback::try_from).collect()
    }

    async fn find_by_id(&self, id: &FeedbackId) -> Result<Option<Feedback>, PersistenceError> {
        let query = Query::new().with_filter("id", id.as_str()).with_limit(1);
        let documents: Vec<FeedbackDocument> = self.client.find(COLLECTION, &query).await?;
        documents
            .into_iter()
            .next()
            .map(Feedback::try_from)
            .transpose()
    }

    async fn update(
        &self,
        id: &FeedbackId,
        patch: &FeedbackPatch,
    ) -> Result<(), PersistenceError> {
        let document = FeedbackPatchDocument {
            status: patch.status(),
            admin_response: patch.admin_response(),
        };
        self.client.update(COLLECTION, id.as_str(), &document).await
    }

    async fn delete(&self, id: &FeedbackId) -> Result<(), PersistenceError> {
        self.client.delete(COLLECTION, id.as_str()).await
    }
}
