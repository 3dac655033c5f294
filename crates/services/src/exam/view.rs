use exam_core::model::{Question, SessionPhase, SubmitReason};

use super::engine::TestSession;

/// Everything a renderer needs, derived from a [`TestSession`].
///
/// Holds no formatting beyond the `M:SS` clock; the UI decides how to show
/// the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub current_question: Option<Question>,
    pub selected_option_for_current: Option<String>,
    /// 1-based; 0 when no question is loaded.
    pub question_number: usize,
    pub question_count: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub can_go_next: bool,
    pub can_submit: bool,
    pub time_remaining: u32,
    pub minutes_seconds: String,
    /// A timeout submission failed and will be sent again.
    pub submit_pending_retry: bool,
    pub last_error: Option<String>,
}

impl SessionView {
    #[must_use]
    pub fn project(session: &TestSession) -> Self {
        let phase = session.phase();
        let in_progress = phase == SessionPhase::InProgress;
        let current_question = match phase {
            SessionPhase::InProgress | SessionPhase::Submitting => {
                session.current_question().cloned()
            }
            _ => None,
        };
        let question_number = if current_question.is_some() {
            session.current_index() + 1
        } else {
            0
        };
        let selected_option_for_current = session.current_answer().selected().map(str::to_string);
        let answered = session.current_answer().is_recorded();

        let is_first = session.is_first();
        let is_last = session.is_last();
        let timeout_pending = session
            .pending()
            .is_some_and(|p| p.reason == SubmitReason::Timeout);
        let last_error = session
            .load_error()
            .map(ToString::to_string)
            .or_else(|| session.submit_error().map(ToString::to_string));

        Self {
            phase,
            current_question,
            selected_option_for_current,
            question_number,
            question_count: session.question_count(),
            is_first,
            is_last,
            can_go_next: in_progress && !is_last && answered,
            can_submit: in_progress && (is_last || session.is_submit_eligible()),
            time_remaining: session.time_remaining(),
            minutes_seconds: format_minutes_seconds(session.time_remaining()),
            submit_pending_retry: phase == SessionPhase::Submitting
                && timeout_pending
                && session.submit_error().is_some(),
            last_error,
        }
    }
}

/// Render seconds as `M:SS`.
#[must_use]
pub fn format_minutes_seconds(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
