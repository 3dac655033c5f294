use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} has an empty option")]
    EmptyOption { id: QuestionId },

    #[error("question {id} lists option {option:?} more than once")]
    DuplicateOption { id: QuestionId, option: String },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from a question bank file or a row.
///
/// Accepts the `question` key used by bank files as an alias for `prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
}

impl QuestionDraft {
    /// Validate into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank, there are no options,
    /// an option is blank, or an option is repeated.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id;
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }

        let mut options: Vec<String> = Vec::with_capacity(self.options.len());
        for raw in self.options {
            let option = raw.trim().to_string();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { id });
            }
            if options.contains(&option) {
                return Err(QuestionError::DuplicateOption { id, option });
            }
            options.push(option);
        }

        Ok(Question {
            id,
            prompt,
            options,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
}

impl Question {
    /// Build and validate a question in one step.
    ///
    /// # Errors
    ///
    /// See [`QuestionDraft::validate`].
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft {
            id,
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
        .validate()
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_prompt_and_options() {
        let q = Question::new(QuestionId::new(1), "  2 + 2?  ", [" 3", "4 "]).unwrap();
        assert_eq!(q.prompt(), "2 + 2?");
        assert_eq!(q.options(), ["3", "4"]);
        assert!(q.has_option("4"));
        assert!(!q.has_option(" 4"));
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new(QuestionId::new(1), "   ", ["A"]).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt { id: QuestionId::new(1) });
    }

    #[test]
    fn rejects_missing_options() {
        let err = Question::new(QuestionId::new(2), "Pick", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, QuestionError::NoOptions { .. }));
    }

    #[test]
    fn rejects_duplicate_options_after_trim() {
        let err = Question::new(QuestionId::new(3), "Pick", ["A", " A "]).unwrap_err();
        assert_eq!(
            err,
            QuestionError::DuplicateOption {
                id: QuestionId::new(3),
                option: "A".into()
            }
        );
    }

    #[test]
    fn draft_accepts_bank_file_shape() {
        let draft: QuestionDraft = serde_json::from_str(
            r#"{ "id": 5, "question": "Capital of France?", "options": ["Paris", "Rome"] }"#,
        )
        .unwrap();
        let q = draft.validate().unwrap();
        assert_eq!(q.id(), QuestionId::new(5));
        assert_eq!(q.prompt(), "Capital of France?");
    }
}
