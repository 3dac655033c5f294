use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {0} is not part of this test")]
    UnknownQuestion(QuestionId),

    #[error("{option:?} is not an option of question {id}")]
    InvalidOption { id: QuestionId, option: String },
}

//
// ─── ANSWER STATES ─────────────────────────────────────────────────────────────
//

/// Live state of a single question while the test is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Selected(String),
    Skipped,
    Unanswered,
}

impl Answer {
    /// True for `Selected` and `Skipped`.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Answer::Unanswered)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match self {
            Answer::Selected(option) => Some(option),
            Answer::Skipped | Answer::Unanswered => None,
        }
    }
}

/// Outgoing state of a question once the test is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalAnswer {
    Selected(String),
    Skipped,
}

impl FinalAnswer {
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match self {
            FinalAnswer::Selected(option) => Some(option),
            FinalAnswer::Skipped => None,
        }
    }
}

impl std::fmt::Display for FinalAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalAnswer::Selected(option) => write!(f, "{option}"),
            FinalAnswer::Skipped => write!(f, "(skipped)"),
        }
    }
}

//
// ─── ANSWER MAP ────────────────────────────────────────────────────────────────
//

/// Partial answers keyed by question id.
///
/// Only `Selected` and `Skipped` are stored; a missing key reads as
/// `Unanswered`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: BTreeMap<QuestionId, Answer>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Answer {
        self.entries.get(&id).cloned().unwrap_or(Answer::Unanswered)
    }

    #[must_use]
    pub fn selected(&self, id: QuestionId) -> Option<&str> {
        self.entries.get(&id).and_then(Answer::selected)
    }

    #[must_use]
    pub fn has_answer(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &Answer)> {
        self.entries.iter().map(|(id, answer)| (*id, answer))
    }

    /// Record `option` for `question`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidOption` if `option` is not one of the
    /// question's options; the map is left untouched.
    pub fn select(&mut self, question: &Question, option: &str) -> Result<(), AnswerError> {
        if !question.has_option(option) {
            return Err(AnswerError::InvalidOption {
                id: question.id(),
                option: option.to_string(),
            });
        }
        self.entries
            .insert(question.id(), Answer::Selected(option.to_string()));
        Ok(())
    }

    /// Mark `id` as skipped unless it already has an entry.
    ///
    /// Returns `true` when the map changed.
    pub fn skip_if_absent(&mut self, id: QuestionId) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, Answer::Skipped);
        true
    }

    /// Drop entries that do not fit `questions`: unknown ids, options that are
    /// not offered, and stray `Unanswered` values.
    ///
    /// Returns the number of entries removed.
    pub fn retain_valid(&mut self, questions: &[Question]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, answer| {
            let Some(question) = questions.iter().find(|q| q.id() == *id) else {
                return false;
            };
            match answer {
                Answer::Selected(option) => question.has_option(option),
                Answer::Skipped => true,
                Answer::Unanswered => false,
            }
        });
        before - self.entries.len()
    }

    /// Complete the map over `ids`, coercing anything not recorded to `Skipped`.
    #[must_use]
    pub fn finalize(&self, ids: impl IntoIterator<Item = QuestionId>) -> FinalizedAnswers {
        let entries = ids
            .into_iter()
            .map(|id| {
                let answer = match self.entries.get(&id) {
                    Some(Answer::Selected(option)) => FinalAnswer::Selected(option.clone()),
                    Some(Answer::Skipped | Answer::Unanswered) | None => FinalAnswer::Skipped,
                };
                (id, answer)
            })
            .collect();
        FinalizedAnswers { entries }
    }
}

/// Total answer map covering every question of a test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalizedAnswers {
    entries: BTreeMap<QuestionId, FinalAnswer>,
}

impl FinalizedAnswers {
    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&FinalAnswer> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &FinalAnswer)> {
        self.entries.iter().map(|(id, answer)| (*id, answer))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.entries
            .values()
            .filter(|answer| matches!(answer, FinalAnswer::Skipped))
            .count()
    }
}

impl FromIterator<(QuestionId, FinalAnswer)> for FinalizedAnswers {
    fn from_iter<T: IntoIterator<Item = (QuestionId, FinalAnswer)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64) -> Question {
        Question::new(QuestionId::new(id), format!("Q{id}"), ["A", "B"]).unwrap()
    }

    #[test]
    fn missing_entry_reads_as_unanswered() {
        let map = AnswerMap::new();
        assert_eq!(map.get(QuestionId::new(1)), Answer::Unanswered);
        assert!(!map.get(QuestionId::new(1)).is_recorded());
    }

    #[test]
    fn select_rejects_foreign_option() {
        let mut map = AnswerMap::new();
        let err = map.select(&question(1), "C").unwrap_err();
        assert!(matches!(err, AnswerError::InvalidOption { .. }));
        assert!(map.is_empty());
    }

    #[test]
    fn skip_keeps_existing_selection() {
        let mut map = AnswerMap::new();
        map.select(&question(1), "B").unwrap();
        assert!(!map.skip_if_absent(QuestionId::new(1)));
        assert_eq!(map.selected(QuestionId::new(1)), Some("B"));
    }

    #[test]
    fn finalize_covers_every_id() {
        let mut map = AnswerMap::new();
        map.select(&question(1), "A").unwrap();
        map.skip_if_absent(QuestionId::new(2));

        let done = map.finalize([1, 2, 3].map(QuestionId::new));

        assert_eq!(done.len(), 3);
        assert_eq!(
            done.get(QuestionId::new(1)),
            Some(&FinalAnswer::Selected("A".into()))
        );
        assert_eq!(done.get(QuestionId::new(2)), Some(&FinalAnswer::Skipped));
        assert_eq!(done.get(QuestionId::new(3)), Some(&FinalAnswer::Skipped));
        assert_eq!(done.skipped_count(), 2);
    }

    #[test]
    fn retain_valid_drops_stale_entries() {
        let json = r#"{ "1": { "selected": "B" }, "2": { "selected": "Z" }, "9": "skipped", "3": "unanswered" }"#;
        let mut map: AnswerMap = serde_json::from_str(json).unwrap();
        let questions = [question(1), question(2), question(3)];

        let removed = map.retain_valid(&questions);

        assert_eq!(removed, 3);
        assert_eq!(map.selected(QuestionId::new(1)), Some("B"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn snapshot_json_shape_is_stable() {
        let mut map = AnswerMap::new();
        map.select(&question(1), "B").unwrap();
        map.skip_if_absent(QuestionId::new(2));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1":{"selected":"B"},"2":"skipped"}"#);
    }
}
