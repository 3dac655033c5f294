use std::sync::Arc;

use chrono::{DateTime, Utc};
use exam_core::model::{AdminSettings, SubmissionRecord, UserRecord};
use storage::repository::{SubmissionRepository, UserRepository};

use crate::Clock;
use crate::error::AdminError;

/// Proof that the admin password was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGrant {
    granted_at: DateTime<Utc>,
}

impl AdminGrant {
    #[must_use]
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }
}

/// Read-only dashboard queries behind a shared password.
#[derive(Clone)]
pub struct AdminService {
    clock: Clock,
    settings: AdminSettings,
    users: Arc<dyn UserRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl AdminService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: AdminSettings,
        users: Arc<dyn UserRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            users,
            submissions,
        }
    }

    /// # Errors
    ///
    /// Returns `AdminError::IncorrectPassword` when `input` does not match.
    pub fn verify_password(&self, input: &str) -> Result<AdminGrant, AdminError> {
        if !self.settings.accepts(input) {
            tracing::warn!("rejected admin password");
            return Err(AdminError::IncorrectPassword);
        }
        tracing::info!("admin access granted");
        Ok(AdminGrant {
            granted_at: self.clock.now(),
        })
    }

    /// All participants, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` on backend failures.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AdminError> {
        Ok(self.users.list_users().await?)
    }

    /// All submissions in the order they were received.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` on backend failures.
    pub async fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, AdminError> {
        Ok(self.submissions.list_submissions().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::repository::Storage;

    fn service(storage: &Storage) -> AdminService {
        AdminService::new(
            fixed_clock(),
            AdminSettings::new("s3cret").unwrap(),
            Arc::clone(&storage.users),
            Arc::clone(&storage.submissions),
        )
    }

    #[test]
    fn password_must_match() {
        let storage = Storage::in_memory();
        let admin = service(&storage);
        assert!(matches!(
            admin.verify_password("nope"),
            Err(AdminError::IncorrectPassword)
        ));
        let grant = admin.verify_password("s3cret").unwrap();
        assert_eq!(grant.granted_at(), fixed_now());
    }

    #[tokio::test]
    async fn empty_listings() {
        let storage = Storage::in_memory();
        let admin = service(&storage);
        assert!(admin.list_users().await.unwrap().is_empty());
        assert!(admin.list_submissions().await.unwrap().is_empty());
    }
}
