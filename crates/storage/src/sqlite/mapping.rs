use chrono::{DateTime, Utc};
use exam_core::model::{
    DisplayName, Email, FinalizedAnswers, Question, QuestionDraft, QuestionId, SubmissionId,
    SubmissionRecord, UserRecord,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserRecord, StorageError> {
    let name = DisplayName::new(row.try_get::<String, _>("name").map_err(ser)?).map_err(ser)?;
    let email = Email::new(row.try_get::<String, _>("email").map_err(ser)?).map_err(ser)?;
    let last_login: DateTime<Utc> = row.try_get("last_login").map_err(ser)?;
    Ok(UserRecord {
        name,
        email,
        last_login,
    })
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(i64_to_u64("id", row.try_get("id").map_err(ser)?)?);
    let prompt: String = row.try_get("prompt").map_err(ser)?;
    let options_json: String = row.try_get("options_json").map_err(ser)?;
    let options: Vec<String> = serde_json::from_str(&options_json).map_err(ser)?;

    QuestionDraft {
        id,
        prompt,
        options,
    }
    .validate()
    .map_err(ser)
}

pub(crate) fn map_submission_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<SubmissionRecord, StorageError> {
    let id = SubmissionId::new(i64_to_u64("id", row.try_get("id").map_err(ser)?)?);
    let name = DisplayName::new(row.try_get::<String, _>("name").map_err(ser)?).map_err(ser)?;
    let email = Email::new(row.try_get::<String, _>("email").map_err(ser)?).map_err(ser)?;
    let answers_json: String = row.try_get("answers_json").map_err(ser)?;
    let answers: FinalizedAnswers = serde_json::from_str(&answers_json).map_err(ser)?;
    let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(ser)?;

    Ok(SubmissionRecord {
        id: Some(id),
        name,
        email,
        answers,
        submitted_at,
    })
}
