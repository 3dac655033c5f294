use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{
    Email, Identity, Question, QuestionId, SubmissionId, SubmissionRecord, UserRecord,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for login records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user or refresh `last_login` and display name for an existing email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn record_login(
        &self,
        identity: &Identity,
        at: DateTime<Utc>,
    ) -> Result<UserRecord, StorageError>;

    /// Fetch a user by email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing user is `Ok(None)`.
    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StorageError>;

    /// List every user, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;
}

/// Repository contract for the question bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert or replace a question at the given position in the test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, position: u32, question: &Question)
    -> Result<(), StorageError>;

    /// List the whole bank in test order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures or unreadable rows.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Append-only repository for submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Append a submission and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_submission(
        &self,
        record: &SubmissionRecord,
    ) -> Result<SubmissionId, StorageError>;

    /// List every submission in append order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures or unreadable rows.
    async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<Email, UserRecord>>>,
    questions: Arc<Mutex<HashMap<QuestionId, (u32, Question)>>>,
    submissions: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn record_login(
        &self,
        identity: &Identity,
        at: DateTime<Utc>,
    ) -> Result<UserRecord, StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let record = UserRecord::from_identity(identity, at);
        guard.insert(identity.email().clone(), record.clone());
        Ok(record)
    }

    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut users: Vec<_> = guard.values().cloned().collect();
        users.sort_by(|a, b| {
            b.last_login
                .cmp(&a.last_login)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(users)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(
        &self,
        position: u32,
        question: &Question,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question.id(), (position, question.clone()));
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<_> = guard.values().cloned().collect();
        rows.sort_by_key(|(position, question)| (*position, question.id()));
        Ok(rows.into_iter().map(|(_, question)| question).collect())
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryRepository {
    async fn append_submission(
        &self,
        record: &SubmissionRecord,
    ) -> Result<SubmissionId, StorageError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = SubmissionId::new(guard.len() as u64 + 1);
        guard.push(record.clone().with_id(id));
        Ok(id)
    }

    async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, StorageError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let submissions: Arc<dyn SubmissionRepository> = Arc::new(repo);
        Self {
            users,
            questions,
            submissions,
        }
    }
}
