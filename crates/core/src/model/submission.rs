use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::FinalizedAnswers;
use crate::model::identity::{DisplayName, Email, Identity};
use crate::model::ids::SubmissionId;

/// A participant as recorded by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: DisplayName,
    pub email: Email,
    pub last_login: DateTime<Utc>,
}

impl UserRecord {
    #[must_use]
    pub fn from_identity(identity: &Identity, last_login: DateTime<Utc>) -> Self {
        Self {
            name: identity.display_name().clone(),
            email: identity.email().clone(),
            last_login,
        }
    }
}

/// An appended test submission. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Option<SubmissionId>,
    pub name: DisplayName,
    pub email: Email,
    pub answers: FinalizedAnswers,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Build a record that has not been assigned a storage id yet.
    #[must_use]
    pub fn new(identity: &Identity, answers: FinalizedAnswers, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: identity.display_name().clone(),
            email: identity.email().clone(),
            answers,
            submitted_at,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: SubmissionId) -> Self {
        self.id = Some(id);
        self
    }
}
