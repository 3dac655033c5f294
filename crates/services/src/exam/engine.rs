use std::sync::Arc;

use exam_core::model::{Answer, ExamSettings, Identity, Question, SessionPhase, SubmitReason};
use storage::answer_cache::AnswerCache;

use crate::answer_store::AnswerStore;
use crate::countdown::{Countdown, Tick};
use crate::error::{LoadError, SubmitError};
use crate::gateway::{PendingSubmission, QuestionSource, SubmissionGateway, SubmissionReceipt};

/// One participant's timed run through the question list.
///
/// Every operation is total: calling it in a phase where it does not apply
/// leaves the session untouched and returns `false` (or `None`).
pub struct TestSession {
    identity: Identity,
    settings: ExamSettings,
    phase: SessionPhase,
    store: AnswerStore,
    countdown: Countdown,
    current: usize,
    submit_eligible: bool,
    pending: Option<PendingSubmission>,
    in_flight: bool,
    receipt: Option<SubmissionReceipt>,
    load_error: Option<LoadError>,
    submit_error: Option<SubmitError>,
}

impl TestSession {
    /// A session in `Loading` for `identity`.
    #[must_use]
    pub fn new(identity: Identity, settings: ExamSettings, cache: Arc<dyn AnswerCache>) -> Self {
        let store = AnswerStore::new(identity.email().clone(), cache);
        Self {
            identity,
            settings,
            phase: SessionPhase::Loading,
            store,
            countdown: Countdown::new(settings.duration_secs()),
            current: 0,
            submit_eligible: false,
            pending: None,
            in_flight: false,
            receipt: None,
            load_error: None,
            submit_error: None,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.store.questions()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.store.questions().len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.store.questions().get(self.current)
    }

    #[must_use]
    pub fn current_answer(&self) -> Answer {
        self.current_question()
            .map_or(Answer::Unanswered, |q| self.store.get(q.id()))
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.store
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn is_submit_eligible(&self) -> bool {
        self.submit_eligible
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingSubmission> {
        self.pending.as_ref()
    }

    /// True while a gateway call for the pending submission is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&SubmitError> {
        self.submit_error.as_ref()
    }

    /// A timeout submission failed and is waiting for [`Self::begin_retry`].
    #[must_use]
    pub fn needs_retry(&self) -> bool {
        self.phase == SessionPhase::Submitting && !self.in_flight && self.pending.is_some()
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Fetch questions and enter `InProgress`.
    pub async fn load(&mut self, source: &dyn QuestionSource) -> bool {
        if self.phase != SessionPhase::Loading {
            return false;
        }
        let result = source.fetch_questions(&self.identity).await;
        self.complete_load(result)
    }

    /// Apply a question-source result obtained elsewhere.
    pub fn complete_load(&mut self, result: Result<Vec<Question>, LoadError>) -> bool {
        if self.phase != SessionPhase::Loading {
            return false;
        }

        let questions = match result {
            Ok(questions) if questions.is_empty() => {
                self.fail_load(LoadError::Empty);
                return true;
            }
            Ok(questions) => questions,
            Err(err) => {
                self.fail_load(err);
                return true;
            }
        };

        let restored = self.store.restore(questions);
        self.current = 0;
        self.countdown.restart(self.settings.duration_secs());
        let email = self.identity.email().to_string();
        self.countdown.on_expire(move || {
            tracing::info!(email = %email, "time is up");
        });
        self.countdown.start();
        self.phase = SessionPhase::InProgress;

        tracing::info!(
            email = %self.identity.email(),
            questions = self.question_count(),
            restored,
            "test started"
        );
        true
    }

    fn fail_load(&mut self, err: LoadError) {
        tracing::warn!(email = %self.identity.email(), error = %err, "failed to load questions");
        self.load_error = Some(err);
        self.phase = SessionPhase::Failed;
    }

    //
    // ─── ANSWERING & NAVIGATION ────────────────────────────────────────────────
    //

    /// Select `option` for the current question.
    pub fn select(&mut self, option: &str) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        let Some(id) = self.current_question().map(Question::id) else {
            return false;
        };
        match self.store.record_selection(id, option) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "ignored selection");
                false
            }
        }
    }

    /// Move forward once the current question has an answer.
    pub fn next(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress || self.is_last() {
            return false;
        }
        if !self.current_answer().is_recorded() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Skip the current question and advance.
    ///
    /// An existing answer is kept. On the last question the position stays put
    /// and the session becomes eligible for submission.
    pub fn skip(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        let Some(id) = self.current_question().map(Question::id) else {
            return false;
        };
        if let Err(err) = self.store.record_skip(id) {
            tracing::debug!(error = %err, "ignored skip");
            return false;
        }
        if self.is_last() {
            self.submit_eligible = true;
        } else {
            self.current += 1;
        }
        true
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.question_count()
    }

    //
    // ─── TIMER ─────────────────────────────────────────────────────────────────
    //

    /// Advance the countdown by one second.
    ///
    /// Returns the timeout submission to send when time has just run out.
    pub fn tick(&mut self) -> Option<PendingSubmission> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        match self.countdown.tick() {
            Tick::Expired => self.begin_submit(SubmitReason::Timeout),
            Tick::Idle | Tick::Running(_) => None,
        }
    }

    /// [`Self::tick`], sending the timeout submission if one was started.
    pub async fn tick_with(&mut self, gateway: &dyn SubmissionGateway) -> bool {
        let Some(pending) = self.tick() else {
            return false;
        };
        let result = gateway.submit(&pending).await;
        self.complete_submit(result)
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Finalize answers, stop the timer, and enter `Submitting`.
    ///
    /// Returns `None` unless the session is `InProgress`, so a second submit
    /// never produces a second payload.
    pub fn begin_submit(&mut self, reason: SubmitReason) -> Option<PendingSubmission> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        self.countdown.stop();
        let pending = PendingSubmission {
            identity: self.identity.clone(),
            answers: self.store.finalize_all(),
            reason,
        };
        self.phase = SessionPhase::Submitting;
        self.pending = Some(pending.clone());
        self.in_flight = true;
        self.submit_error = None;

        tracing::debug!(
            reason = reason.as_str(),
            remaining = self.countdown.remaining(),
            "submitting"
        );
        Some(pending)
    }

    /// Re-send a failed timeout submission with the same answers.
    pub fn begin_retry(&mut self) -> Option<PendingSubmission> {
        if !self.needs_retry() {
            return None;
        }
        self.in_flight = true;
        self.pending.clone()
    }

    /// Apply the gateway's answer for the outstanding submission.
    pub fn complete_submit(&mut self, result: Result<SubmissionReceipt, SubmitError>) -> bool {
        if self.phase != SessionPhase::Submitting || !self.in_flight {
            return false;
        }
        self.in_flight = false;
        let Some(reason) = self.pending.as_ref().map(|p| p.reason) else {
            return false;
        };

        match result {
            Ok(receipt) => {
                self.store.clear();
                self.pending = None;
                self.submit_error = None;
                self.receipt = Some(receipt);
                self.phase = SessionPhase::Submitted;
                tracing::info!(
                    email = %self.identity.email(),
                    id = %receipt.id,
                    reason = reason.as_str(),
                    "submission confirmed"
                );
            }
            Err(err) => {
                tracing::warn!(
                    email = %self.identity.email(),
                    reason = reason.as_str(),
                    error = %err,
                    "submission failed"
                );
                self.submit_error = Some(err);
                if reason == SubmitReason::UserInitiated {
                    self.pending = None;
                    self.phase = SessionPhase::InProgress;
                    self.countdown.start();
                }
            }
        }
        true
    }

    /// Submit and wait for the gateway.
    pub async fn submit(&mut self, reason: SubmitReason, gateway: &dyn SubmissionGateway) -> bool {
        let Some(pending) = self.begin_submit(reason) else {
            return false;
        };
        let result = gateway.submit(&pending).await;
        self.complete_submit(result)
    }

    /// Retry a failed timeout submission and wait for the gateway.
    pub async fn retry_submit(&mut self, gateway: &dyn SubmissionGateway) -> bool {
        let Some(pending) = self.begin_retry() else {
            return false;
        };
        let result = gateway.submit(&pending).await;
        self.complete_submit(result)
    }
}
