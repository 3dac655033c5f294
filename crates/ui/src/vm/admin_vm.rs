use exam_core::model::{SubmissionRecord, UserRecord};

use super::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRowVm {
    pub name: String,
    pub email: String,
    pub last_login_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRowVm {
    pub key: String,
    pub name: String,
    pub email: String,
    pub submitted_at_str: String,
    /// One `Q{id}: {answer}` line per question.
    pub answer_lines: Vec<String>,
}

#[must_use]
pub fn map_user_rows(users: &[UserRecord]) -> Vec<UserRowVm> {
    users
        .iter()
        .map(|user| UserRowVm {
            name: user.name.to_string(),
            email: user.email.to_string(),
            last_login_str: format_datetime(user.last_login),
        })
        .collect()
}

#[must_use]
pub fn map_submission_rows(submissions: &[SubmissionRecord]) -> Vec<SubmissionRowVm> {
    submissions
        .iter()
        .enumerate()
        .map(|(idx, record)| SubmissionRowVm {
            key: record
                .id
                .map_or_else(|| format!("row-{idx}"), |id| id.to_string()),
            name: record.name.to_string(),
            email: record.email.to_string(),
            submitted_at_str: format_datetime(record.submitted_at),
            answer_lines: record
                .answers
                .iter()
                .map(|(id, answer)| format!("Q{id}: {answer}"))
                .collect(),
        })
        .collect()
}
