use serde::{Deserialize, Serialize};

/// Top-level state of a participant's test session.
///
/// Transitions are linear: `Loading → InProgress → Submitting → Submitted`,
/// with `Failed` as the terminal state when questions cannot be loaded. The
/// only backwards edge is `Submitting → InProgress` after a failed
/// user-initiated submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    InProgress,
    Submitting,
    Submitted,
    Failed,
}

impl SessionPhase {
    /// No further transitions are possible from this phase.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Submitted | SessionPhase::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::InProgress => "in_progress",
            SessionPhase::Submitting => "submitting",
            SessionPhase::Submitted => "submitted",
            SessionPhase::Failed => "failed",
        }
    }
}

/// Why a submission was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// The participant confirmed a manual submit.
    UserInitiated,
    /// The countdown reached zero.
    Timeout,
}

impl SubmitReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitReason::UserInitiated => "user_initiated",
            SubmitReason::Timeout => "timeout",
        }
    }
}
