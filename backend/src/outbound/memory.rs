//! In-memory repositories for tests and store-less development.
//!
//! The server falls back to these when no store URL is configured, so the
//! application can be exercised end-to-end without the external service.
//! They mirror the constraints the managed store declares: the unique email
//! index and newest-first query ordering. An insertion sequence breaks ties
//! between records created within the same timestamp tick.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::ports::{FeedbackRepository, PersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, Feedback, FeedbackFilter, FeedbackId, FeedbackPatch, FeedbackStatus,
    NewFeedback, NewUser, User, UserId,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn generated_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// [`UserRepository`] holding records in process memory.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, PersistenceError> {
        let mut records = lock(&self.records);
        if records.iter().any(|existing| existing.email == *user.email()) {
            return Err(PersistenceError::conflict("email"));
        }
        let id = UserId::new(generated_id())
            .map_err(|err| PersistenceError::backend(format!("generated invalid id: {err}")))?;
        let now = Utc::now();
        let record = User {
            id,
            email: user.email().clone(),
            name: user.name().to_owned(),
            is_admin: user.is_admin(),
            password_hash: user.password_hash().to_owned(),
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, PersistenceError> {
        let records = lock(&self.records);
        Ok(records.iter().find(|user| user.email == *email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let records = lock(&self.records);
        Ok(records.iter().find(|user| user.id == *id).cloned())
    }

    async fn admin_exists(&self) -> Result<bool, PersistenceError> {
        let records = lock(&self.records);
        Ok(records.iter().any(|user| user.is_admin))
    }
}

#[derive(Default)]
struct FeedbackRows {
    entries: Vec<(u64, Feedback)>,
    next_seq: u64,
}

/// [`FeedbackRepository`] holding records in process memory.
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    rows: Mutex<FeedbackRows>,
}

impl InMemoryFeedbackRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, feedback: NewFeedback) -> Result<Feedback, PersistenceError> {
        let mut rows = lock(&self.rows);
        let id = FeedbackId::new(generated_id())
            .map_err(|err| PersistenceError::backend(format!("generated invalid id: {err}")))?;
        let now = Utc::now();
        let record = Feedback {
            id,
            user_id: feedback.user_id().clone(),
            user_name: feedback.user_name().to_owned(),
            user_email: feedback.user_email().to_owned(),
            rating: feedback.rating(),
            comment: feedback.comment().to_owned(),
            category: feedback.category(),
            status: FeedbackStatus::Open,
            admin_response: None,
            created_at: now,
            updated_at: now,
        };
        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.entries.push((seq, record.clone()));
        Ok(record)
    }

    async fn find(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>, PersistenceError> {
        let rows = lock(&self.rows);
        let mut matches: Vec<&(u64, Feedback)> = rows
            .entries
            .iter()
            .filter(|(_, entry)| {
                filter.category.is_none_or(|category| entry.category == category)
                    && filter.status.is_none_or(|status| entry.status == status)
            })
            .collect();
        matches.sort_by(|(seq_a, a), (seq_b, b)| {
            (b.created_at, seq_b).cmp(&(a.created_at, seq_a))
        });
        if let Some(limit) = filter.limit {
            matches.truncate(limit);
        }
        Ok(matches.into_iter().map(|(_, entry)| entry.clone()).collect())
    }

    async fn find_by_id(&self, id: &FeedbackId) -> Result<Option<Feedback>, PersistenceError> {
        let rows = lock(&self.rows);
        Ok(rows
            .entries
            .iter()
            .find(|(_, entry)| entry.id == *id)
            .map(|(_, entry)| entry.clone()))
    }

    async fn update(
        &self,
        id: &FeedbackId,
        patch: &FeedbackPatch,
    ) -> Result<(), PersistenceError> {
        let mut rows = lock(&self.rows);
        let entry = rows
            .entries
            .iter_mut()
            .map(|(_, entry)| entry)
            .find(|entry| entry.id == *id)
            .ok_or(PersistenceError::NotFound)?;
        if let Some(status) = patch.status() {
            entry.status = status;
        }
        if let Some(response) = patch.admin_response() {
            // An explicit empty string clears the response, matching the
            // store's empty-until-written convention.
            entry.admin_response = if response.is_empty() {
                None
            } else {
                Some(response.to_owned())
            };
        }
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &FeedbackId) -> Result<(), PersistenceError> {
        let mut rows = lock(&self.rows);
        let position = rows
            .entries
            .iter()
            .position(|(_, entry)| entry.id == *id)
            .ok_or(PersistenceError::NotFound)?;
        rows.entries.remove(position);
        Ok(())
    }
}
