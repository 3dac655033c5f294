use std::sync::Arc;

use exam_core::model::{AdminSettings, ExamSettings};
use storage::answer_cache::AnswerCache;
use storage::repository::Storage;

use crate::Clock;
use crate::admin_service::AdminService;
use crate::error::AppServicesError;
use crate::exam::ExamLoopService;
use crate::gateway::{StorageQuestionSource, StorageSubmissionGateway};
use crate::login_service::LoginService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    login: Arc<LoginService>,
    admin: Arc<AdminService>,
    exam: Arc<ExamLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        exam: ExamSettings,
        admin: AdminSettings,
        cache: Arc<dyn AnswerCache>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, exam, admin, cache))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        exam: ExamSettings,
        admin: AdminSettings,
        cache: Arc<dyn AnswerCache>,
    ) -> Self {
        let source = Arc::new(StorageQuestionSource::new(
            Arc::clone(&storage.users),
            Arc::clone(&storage.questions),
        ));
        let gateway = Arc::new(StorageSubmissionGateway::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.submissions),
        ));

        Self {
            login: Arc::new(LoginService::new(clock, Arc::clone(&storage.users))),
            admin: Arc::new(AdminService::new(
                clock,
                admin,
                Arc::clone(&storage.users),
                Arc::clone(&storage.submissions),
            )),
            exam: Arc::new(ExamLoopService::new(exam, cache, source, gateway)),
        }
    }

    #[must_use]
    pub fn login(&self) -> Arc<LoginService> {
        Arc::clone(&self.login)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }

    #[must_use]
    pub fn exam(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam)
    }
}
