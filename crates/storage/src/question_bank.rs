//! Question bank import from JSON files.
//!
//! The file is a JSON array of `{ "id": 1, "question": "...", "options": [...] }`
//! objects, in test order.

use std::path::Path;

use exam_core::model::{Question, QuestionDraft, QuestionError};
use thiserror::Error;

use crate::repository::{QuestionRepository, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("cannot read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("question bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("question bank lists id {0} more than once")]
    DuplicateId(exam_core::model::QuestionId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Parse and validate a question bank.
///
/// # Errors
///
/// Returns `QuestionBankError` for malformed JSON, invalid questions, or
/// repeated ids.
pub fn parse_question_bank(json: &str) -> Result<Vec<Question>, QuestionBankError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(json)?;
    let mut questions: Vec<Question> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let question = draft.validate()?;
        if questions.iter().any(|q| q.id() == question.id()) {
            return Err(QuestionBankError::DuplicateId(question.id()));
        }
        questions.push(question);
    }
    Ok(questions)
}

/// Read a bank file from disk.
///
/// # Errors
///
/// See [`parse_question_bank`]; also fails when the file cannot be read.
pub fn load_question_bank_file(path: &Path) -> Result<Vec<Question>, QuestionBankError> {
    let raw = std::fs::read_to_string(path)?;
    parse_question_bank(&raw)
}

/// Upsert every question, using its index in `questions` as the position.
///
/// # Errors
///
/// Returns `QuestionBankError::Storage` if any write fails.
pub async fn import_questions(
    repo: &dyn QuestionRepository,
    questions: &[Question],
) -> Result<usize, QuestionBankError> {
    for (position, question) in questions.iter().enumerate() {
        let position = u32::try_from(position)
            .map_err(|_| StorageError::Serialization("question position overflow".into()))?;
        repo.upsert_question(position, question).await?;
    }
    tracing::info!(count = questions.len(), "imported question bank");
    Ok(questions.len())
}

/// Small built-in bank so a fresh database is immediately usable.
#[must_use]
pub fn sample_questions() -> Vec<Question> {
    let raw = [
        (1, "What does CPU stand for?", &["Central Processing Unit", "Computer Personal Unit", "Central Process Utility"][..]),
        (2, "Which data structure is FIFO?", &["Stack", "Queue", "Tree"][..]),
        (3, "What is 2^10?", &["512", "1000", "1024"][..]),
        (4, "Which protocol secures HTTP traffic?", &["TLS", "FTP", "SMTP"][..]),
    ];
    raw.iter()
        .filter_map(|(id, prompt, options)| {
            Question::new(
                exam_core::model::QuestionId::new(*id),
                *prompt,
                options.iter().copied(),
            )
            .ok()
        })
        .collect()
}
