//! Collaborators the test session talks to: where questions come from and
//! where finalized answers go.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use exam_core::model::{
    FinalizedAnswers, Identity, Question, SubmissionId, SubmissionRecord, SubmitReason,
};
use storage::repository::{QuestionRepository, SubmissionRepository, UserRepository};

use crate::Clock;
use crate::error::{LoadError, SubmitError};

/// A finalized answer map waiting to be accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSubmission {
    pub identity: Identity,
    pub answers: FinalizedAnswers,
    pub reason: SubmitReason,
}

/// Acknowledgement returned by a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Ordered question list for `identity`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unauthorized` for unknown participants and
    /// `LoadError::Unavailable` when the backend cannot answer.
    async fn fetch_questions(&self, identity: &Identity) -> Result<Vec<Question>, LoadError>;
}

#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` for invalid payloads and
    /// `SubmitError::Unavailable` for backend failures.
    async fn submit(&self, submission: &PendingSubmission)
    -> Result<SubmissionReceipt, SubmitError>;
}

//
// ─── STORAGE-BACKED IMPLEMENTATIONS ────────────────────────────────────────────
//

/// Serves the question bank to participants who have logged in.
#[derive(Clone)]
pub struct StorageQuestionSource {
    users: Arc<dyn UserRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl StorageQuestionSource {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { users, questions }
    }
}

#[async_trait]
impl QuestionSource for StorageQuestionSource {
    async fn fetch_questions(&self, identity: &Identity) -> Result<Vec<Question>, LoadError> {
        if self.users.find_user(identity.email()).await?.is_none() {
            tracing::warn!(email = %identity.email(), "question request from unknown participant");
            return Err(LoadError::Unauthorized);
        }
        let questions = self.questions.list_questions().await?;
        tracing::info!(count = questions.len(), email = %identity.email(), "served questions");
        Ok(questions)
    }
}

/// Appends submissions to the submission repository.
#[derive(Clone)]
pub struct StorageSubmissionGateway {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl StorageSubmissionGateway {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            submissions,
        }
    }
}

#[async_trait]
impl SubmissionGateway for StorageSubmissionGateway {
    async fn submit(
        &self,
        submission: &PendingSubmission,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if submission.answers.is_empty() {
            return Err(SubmitError::Rejected("answers are required".into()));
        }
        if self
            .users
            .find_user(submission.identity.email())
            .await?
            .is_none()
        {
            return Err(SubmitError::Rejected("participant is not logged in".into()));
        }

        let submitted_at = self.clock.now();
        let record =
            SubmissionRecord::new(&submission.identity, submission.answers.clone(), submitted_at);
        let id = self.submissions.append_submission(&record).await?;

        tracing::info!(
            id = %id,
            email = %submission.identity.email(),
            reason = submission.reason.as_str(),
            skipped = submission.answers.skipped_count(),
            "stored submission"
        );
        Ok(SubmissionReceipt { id, submitted_at })
    }
}
