mod answer;
mod exam_settings;
mod identity;
mod ids;
mod question;
mod session;
mod submission;

pub use answer::{Answer, AnswerError, AnswerMap, FinalAnswer, FinalizedAnswers};
pub use exam_settings::{
    AdminSettings, DEFAULT_ADMIN_PASSWORD, DEFAULT_DURATION_SECS, ExamSettings, ExamSettingsError,
};
pub use identity::{DisplayName, Email, Identity, IdentityError};
pub use ids::{ParseIdError, QuestionId, SubmissionId};
pub use question::{Question, QuestionDraft, QuestionError};
pub use session::{SessionPhase, SubmitReason};
pub use submission::{SubmissionRecord, UserRecord};
