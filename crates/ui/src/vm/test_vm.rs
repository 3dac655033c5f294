use exam_core::model::{SessionPhase, SubmitReason};
use services::{PendingSubmission, SessionView, SubmissionReceipt, SubmitError, TestSession};

/// Seconds between automatic retries of a failed timeout submission.
pub const RETRY_INTERVAL_SECS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestIntent {
    Select(String),
    Next,
    Previous,
    Skip,
    RequestSubmit,
    CancelSubmit,
    ConfirmSubmit,
    Retry,
}

/// UI wrapper around a [`TestSession`]: adds the confirm step and the retry
/// schedule.
pub struct TestVm {
    session: TestSession,
    confirming: bool,
    retry_in: u32,
}

impl TestVm {
    #[must_use]
    pub fn new(session: TestSession) -> Self {
        Self {
            session,
            confirming: false,
            retry_in: RETRY_INTERVAL_SECS,
        }
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::project(&self.session)
    }

    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    #[must_use]
    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    /// Seconds until the next automatic retry, while one is scheduled.
    #[must_use]
    pub fn retry_in(&self) -> Option<u32> {
        self.session.needs_retry().then_some(self.retry_in)
    }

    /// Apply a user intent. Returns a payload when the intent started a
    /// gateway call.
    pub fn apply(&mut self, intent: TestIntent) -> Option<PendingSubmission> {
        match intent {
            TestIntent::Select(option) => {
                self.session.select(&option);
                None
            }
            TestIntent::Next => {
                self.session.next();
                None
            }
            TestIntent::Previous => {
                self.session.previous();
                None
            }
            TestIntent::Skip => {
                self.session.skip();
                None
            }
            TestIntent::RequestSubmit => {
                self.confirming = self.view().can_submit;
                None
            }
            TestIntent::CancelSubmit => {
                self.confirming = false;
                None
            }
            TestIntent::ConfirmSubmit => {
                if !self.confirming {
                    return None;
                }
                self.confirming = false;
                self.session.begin_submit(SubmitReason::UserInitiated)
            }
            TestIntent::Retry => self.session.begin_retry(),
        }
    }

    /// Called once per second by the view's timer loop.
    pub fn poll(&mut self) -> Option<PendingSubmission> {
        if self.session.phase() == SessionPhase::InProgress {
            let pending = self.session.tick();
            if pending.is_some() {
                self.confirming = false;
            }
            return pending;
        }

        if !self.session.needs_retry() {
            return None;
        }
        self.retry_in = self.retry_in.saturating_sub(1);
        if self.retry_in > 0 {
            return None;
        }
        self.retry_in = RETRY_INTERVAL_SECS;
        self.session.begin_retry()
    }

    pub fn complete_submit(&mut self, result: Result<SubmissionReceipt, SubmitError>) {
        self.session.complete_submit(result);
        self.retry_in = RETRY_INTERVAL_SECS;
    }
}
