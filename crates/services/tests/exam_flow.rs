use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_core::model::{
    Answer, AnswerMap, ExamSettings, FinalAnswer, Identity, Question, QuestionId, SessionPhase,
    SubmissionId, SubmitReason,
};
use exam_core::time::fixed_now;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use services::{
    LoadError, PendingSubmission, QuestionSource, SessionView, SubmissionGateway,
    SubmissionReceipt, SubmitError, TestSession,
};
use storage::answer_cache::{AnswerCache, InMemoryAnswerCache};

//
// ─── FAKES ─────────────────────────────────────────────────────────────────────
//

struct FixedSource(Result<Vec<Question>, LoadError>);

#[async_trait]
impl QuestionSource for FixedSource {
    async fn fetch_questions(&self, _identity: &Identity) -> Result<Vec<Question>, LoadError> {
        self.0.clone()
    }
}

/// Replies from a script, then succeeds; records every payload it sees.
#[derive(Default)]
struct ScriptedGateway {
    script: Mutex<VecDeque<Result<(), SubmitError>>>,
    calls: Mutex<Vec<PendingSubmission>>,
}

impl ScriptedGateway {
    fn failing_first(err: SubmitError) -> Self {
        let gateway = Self::default();
        gateway.script.lock().unwrap().push_back(Err(err));
        gateway
    }

    fn calls(&self) -> Vec<PendingSubmission> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionGateway for ScriptedGateway {
    async fn submit(
        &self,
        submission: &PendingSubmission,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(submission.clone());
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        next.map(|()| SubmissionReceipt {
            id: SubmissionId::new(calls.len() as u64),
            submitted_at: fixed_now(),
        })
    }
}

fn ada() -> Identity {
    Identity::parse("Ada", "ada@example.com").unwrap()
}

fn questions(n: u64) -> Vec<Question> {
    (1..=n)
        .map(|id| Question::new(QuestionId::new(id), format!("Q{id}"), ["A", "B", "C"]).unwrap())
        .collect()
}

async fn loaded(n: u64, duration: u32, cache: Arc<dyn AnswerCache>) -> TestSession {
    let mut session = TestSession::new(ada(), ExamSettings::new(duration).unwrap(), cache);
    assert!(session.load(&FixedSource(Ok(questions(n)))).await);
    session
}

//
// ─── SCENARIOS ─────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn select_skip_then_submit_from_last_question() {
    let gateway = ScriptedGateway::default();
    let mut session = loaded(3, 1800, Arc::new(InMemoryAnswerCache::new())).await;

    assert!(session.select("A"));
    assert!(session.next());
    assert!(session.skip());
    assert_eq!(session.current_index(), 2);
    assert!(SessionView::project(&session).can_submit);

    assert!(session.submit(SubmitReason::UserInitiated, &gateway).await);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    let answers = &calls[0].answers;
    assert_eq!(answers.len(), 3);
    assert_eq!(
        answers.get(QuestionId::new(1)),
        Some(&FinalAnswer::Selected("A".into()))
    );
    assert_eq!(answers.get(QuestionId::new(2)), Some(&FinalAnswer::Skipped));
    assert_eq!(answers.get(QuestionId::new(3)), Some(&FinalAnswer::Skipped));
    assert_eq!(session.phase(), SessionPhase::Submitted);
}

#[tokio::test]
async fn double_submit_calls_gateway_once() {
    let gateway = ScriptedGateway::default();
    let mut session = loaded(2, 1800, Arc::new(InMemoryAnswerCache::new())).await;

    let first = session.begin_submit(SubmitReason::UserInitiated);
    let second = session.begin_submit(SubmitReason::UserInitiated);
    assert!(first.is_some());
    assert!(second.is_none());

    let result = gateway.submit(&first.unwrap()).await;
    assert!(session.complete_submit(result));
    assert!(!session.submit(SubmitReason::UserInitiated, &gateway).await);
    assert!(!session.submit(SubmitReason::Timeout, &gateway).await);

    assert_eq!(gateway.calls().len(), 1);
    assert_eq!(session.phase(), SessionPhase::Submitted);
}

#[tokio::test]
async fn timeout_submits_every_question_as_skipped() {
    let gateway = ScriptedGateway::default();
    let mut session = loaded(3, 2, Arc::new(InMemoryAnswerCache::new())).await;

    assert!(!session.tick_with(&gateway).await);
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert!(session.tick_with(&gateway).await);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].reason, SubmitReason::Timeout);
    assert_eq!(calls[0].answers.skipped_count(), 3);
    assert_eq!(session.phase(), SessionPhase::Submitted);

    assert!(!session.tick_with(&gateway).await);
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn duration_ticks_enter_submitting_exactly_once() {
    let mut session = loaded(2, 5, Arc::new(InMemoryAnswerCache::new())).await;

    let pending: Vec<_> = (0..8).filter_map(|_| session.tick()).collect();

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].reason, SubmitReason::Timeout);
    assert_eq!(session.phase(), SessionPhase::Submitting);
    assert_eq!(session.time_remaining(), 0);
}

#[tokio::test]
async fn rejected_user_submit_returns_to_test() {
    let gateway = ScriptedGateway::failing_first(SubmitError::Rejected("down".into()));
    let mut session = loaded(3, 60, Arc::new(InMemoryAnswerCache::new())).await;
    session.tick();
    session.select("B");
    session.next();
    let remaining = session.time_remaining();

    assert!(session.submit(SubmitReason::UserInitiated, &gateway).await);

    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.time_remaining(), remaining);
    assert!(session.submit_error().is_some());
    assert!(session.previous());
    assert_eq!(session.current_index(), 0);

    session.tick();
    assert_eq!(session.time_remaining(), remaining - 1);

    assert!(session.submit(SubmitReason::UserInitiated, &gateway).await);
    assert_eq!(session.phase(), SessionPhase::Submitted);
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn failed_timeout_submit_stays_submitting_until_retry() {
    let gateway = ScriptedGateway::failing_first(SubmitError::Unavailable("offline".into()));
    let mut session = loaded(2, 1, Arc::new(InMemoryAnswerCache::new())).await;
    session.select("C");

    assert!(session.tick_with(&gateway).await);
    assert_eq!(session.phase(), SessionPhase::Submitting);
    let view = SessionView::project(&session);
    assert!(view.submit_pending_retry);
    assert!(view.last_error.is_some());
    assert!(!session.select("A"));
    assert!(!session.previous());

    assert!(session.retry_submit(&gateway).await);
    assert_eq!(session.phase(), SessionPhase::Submitted);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].answers, calls[1].answers);
    assert!(!session.retry_submit(&gateway).await);
}

#[tokio::test]
async fn load_failures_are_terminal() {
    for (result, expected) in [
        (Err(LoadError::Unauthorized), LoadError::Unauthorized),
        (
            Err(LoadError::Unavailable("db".into())),
            LoadError::Unavailable("db".into()),
        ),
        (Ok(Vec::new()), LoadError::Empty),
    ] {
        let mut session = TestSession::new(
            ada(),
            ExamSettings::default(),
            Arc::new(InMemoryAnswerCache::new()),
        );
        session.load(&FixedSource(result)).await;
        assert_eq!(session.phase(), SessionPhase::Failed);
        assert_eq!(session.load_error(), Some(&expected));
        assert!(!session.load(&FixedSource(Ok(questions(1)))).await);
    }
}

//
// ─── CACHE RECOVERY ────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn reload_restores_cached_selection_before_first_render() {
    let cache = Arc::new(InMemoryAnswerCache::new());
    let mut snapshot = AnswerMap::new();
    snapshot.select(&questions(1)[0], "B").unwrap();
    cache.save(ada().email(), &snapshot).unwrap();

    let session = loaded(3, 1800, cache).await;

    let view = SessionView::project(&session);
    assert_eq!(view.selected_option_for_current.as_deref(), Some("B"));
    assert!(view.can_go_next);
}

#[tokio::test]
async fn confirmed_submit_clears_cache_and_failed_submit_keeps_it() {
    let cache = Arc::new(InMemoryAnswerCache::new());
    let gateway = ScriptedGateway::failing_first(SubmitError::Unavailable("x".into()));
    let mut session = loaded(1, 60, cache.clone()).await;
    session.select("A");

    session.submit(SubmitReason::UserInitiated, &gateway).await;
    assert!(cache.load(ada().email()).unwrap().is_some());

    session.submit(SubmitReason::UserInitiated, &gateway).await;
    assert!(cache.load(ada().email()).unwrap().is_none());
}

//
// ─── PROPERTIES ────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn random_interaction_finalizes_one_valid_entry_per_question() {
    let mut rng = StdRng::seed_from_u64(7);
    let options = ["A", "B", "C", "Z"];

    for round in 0..50 {
        let n = rng.random_range(1..=6);
        let qs = questions(n);
        let mut session = loaded(n, 1800, Arc::new(InMemoryAnswerCache::new())).await;

        for _ in 0..rng.random_range(0..30) {
            match rng.random_range(0..4) {
                0 => {
                    session.select(options[rng.random_range(0..options.len())]);
                }
                1 => {
                    session.skip();
                }
                2 => {
                    session.next();
                }
                _ => {
                    session.previous();
                }
            }
            assert!(session.current_index() < qs.len(), "round {round}");
        }

        let pending = session
            .begin_submit(SubmitReason::UserInitiated)
            .expect("in progress");
        assert_eq!(pending.answers.len(), qs.len());
        for q in &qs {
            match pending.answers.get(q.id()) {
                Some(FinalAnswer::Selected(option)) => assert!(q.has_option(option)),
                Some(FinalAnswer::Skipped) => {}
                None => panic!("missing answer for {}", q.id()),
            }
        }
    }
}

#[tokio::test]
async fn skip_never_overwrites_a_selection() {
    let mut session = loaded(3, 1800, Arc::new(InMemoryAnswerCache::new())).await;
    session.select("C");
    session.skip();
    session.previous();

    assert_eq!(session.current_answer(), Answer::Selected("C".into()));
    session.skip();
    session.previous();
    assert_eq!(session.current_answer(), Answer::Selected("C".into()));
}
