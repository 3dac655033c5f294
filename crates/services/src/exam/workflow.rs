use std::sync::Arc;

use exam_core::model::{ExamSettings, Identity, SubmitReason};
use storage::answer_cache::AnswerCache;

use super::engine::TestSession;
use crate::gateway::{QuestionSource, SubmissionGateway};

/// Wires sessions to their question source, gateway, and answer cache.
#[derive(Clone)]
pub struct ExamLoopService {
    settings: ExamSettings,
    cache: Arc<dyn AnswerCache>,
    source: Arc<dyn QuestionSource>,
    gateway: Arc<dyn SubmissionGateway>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(
        settings: ExamSettings,
        cache: Arc<dyn AnswerCache>,
        source: Arc<dyn QuestionSource>,
        gateway: Arc<dyn SubmissionGateway>,
    ) -> Self {
        Self {
            settings,
            cache,
            source,
            gateway,
        }
    }

    #[must_use]
    pub fn settings(&self) -> ExamSettings {
        self.settings
    }

    #[must_use]
    pub fn source(&self) -> Arc<dyn QuestionSource> {
        Arc::clone(&self.source)
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<dyn SubmissionGateway> {
        Arc::clone(&self.gateway)
    }

    /// A fresh session in `Loading`.
    #[must_use]
    pub fn new_session(&self, identity: Identity) -> TestSession {
        TestSession::new(identity, self.settings, Arc::clone(&self.cache))
    }

    /// Create a session and load its questions.
    ///
    /// The returned session is `InProgress` or, when loading failed, `Failed`.
    pub async fn start_session(&self, identity: Identity) -> TestSession {
        let mut session = self.new_session(identity);
        session.load(self.source.as_ref()).await;
        session
    }

    pub async fn submit(&self, session: &mut TestSession) -> bool {
        session
            .submit(SubmitReason::UserInitiated, self.gateway.as_ref())
            .await
    }

    pub async fn retry(&self, session: &mut TestSession) -> bool {
        session.retry_submit(self.gateway.as_ref()).await
    }

    /// One timer second; sends the timeout submission when time runs out.
    pub async fn tick(&self, session: &mut TestSession) -> bool {
        session.tick_with(self.gateway.as_ref()).await
    }
}
