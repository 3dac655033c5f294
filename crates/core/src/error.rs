use thiserror::Error;

use crate::model::{AnswerError, ExamSettingsError, IdentityError, QuestionError};

/// Umbrella for the validation errors raised by the domain model.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Settings(#[from] ExamSettingsError),
}
