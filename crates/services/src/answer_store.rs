//! Live answers for one participant, mirrored to a local cache.

use std::sync::Arc;

use exam_core::model::{Answer, AnswerError, AnswerMap, Email, FinalizedAnswers, Question, QuestionId};
use storage::answer_cache::AnswerCache;

/// Answer map for a single session.
///
/// Every mutation is written through to the cache; cache failures are logged
/// and otherwise ignored, so the in-memory map always wins.
pub struct AnswerStore {
    key: Email,
    questions: Vec<Question>,
    answers: AnswerMap,
    cache: Arc<dyn AnswerCache>,
}

impl AnswerStore {
    #[must_use]
    pub fn new(key: Email, cache: Arc<dyn AnswerCache>) -> Self {
        Self {
            key,
            questions: Vec::new(),
            answers: AnswerMap::new(),
            cache,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Answer {
        self.answers.get(id)
    }

    /// Install the loaded question set and pull any cached snapshot for it.
    ///
    /// Entries that no longer match `questions` are dropped. Returns the number
    /// of restored entries.
    pub fn restore(&mut self, questions: Vec<Question>) -> usize {
        self.questions = questions;
        self.answers = match self.cache.load(&self.key) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => AnswerMap::new(),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable answer snapshot");
                AnswerMap::new()
            }
        };

        let dropped = self.answers.retain_valid(&self.questions);
        if dropped > 0 {
            tracing::debug!(dropped, "discarded stale cached answers");
        }
        self.answers.len()
    }

    /// Record `option` for question `id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` when `id` is not loaded or `option` is not one of
    /// its options; nothing is recorded in that case.
    pub fn record_selection(&mut self, id: QuestionId, option: &str) -> Result<(), AnswerError> {
        let Some(question) = self.questions.iter().find(|q| q.id() == id) else {
            return Err(AnswerError::UnknownQuestion(id));
        };
        self.answers.select(question, option)?;
        self.persist();
        Ok(())
    }

    /// Mark `id` as skipped unless it already has an entry.
    ///
    /// Returns whether the map changed.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::UnknownQuestion` when `id` is not loaded.
    pub fn record_skip(&mut self, id: QuestionId) -> Result<bool, AnswerError> {
        if self.question(id).is_none() {
            return Err(AnswerError::UnknownQuestion(id));
        }
        let changed = self.answers.skip_if_absent(id);
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    #[must_use]
    pub fn finalize(&self, ids: impl IntoIterator<Item = QuestionId>) -> FinalizedAnswers {
        self.answers.finalize(ids)
    }

    /// Finalize over every loaded question.
    #[must_use]
    pub fn finalize_all(&self) -> FinalizedAnswers {
        self.finalize(self.questions.iter().map(Question::id))
    }

    /// Erase the cached snapshot. Call only once a submission is confirmed.
    pub fn clear(&mut self) {
        if let Err(err) = self.cache.clear(&self.key) {
            tracing::warn!(error = %err, "failed to clear answer snapshot");
        }
    }

    fn persist(&self) {
        if let Err(err) = self.cache.save(&self.key, &self.answers) {
            tracing::warn!(error = %err, "failed to save answer snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::FinalAnswer;
    use storage::answer_cache::{CacheError, InMemoryAnswerCache};

    fn questions() -> Vec<Question> {
        (1..=3)
            .map(|id| Question::new(QuestionId::new(id), format!("Q{id}"), ["A", "B", "C"]).unwrap())
            .collect()
    }

    fn key() -> Email {
        Email::new("ada@example.com").unwrap()
    }

    struct BrokenCache;

    impl AnswerCache for BrokenCache {
        fn load(&self, _key: &Email) -> Result<Option<AnswerMap>, CacheError> {
            Err(CacheError::Corrupt("bad".into()))
        }
        fn save(&self, _key: &Email, _answers: &AnswerMap) -> Result<(), CacheError> {
            Err(CacheError::Poisoned)
        }
        fn clear(&self, _key: &Email) -> Result<(), CacheError> {
            Err(CacheError::Poisoned)
        }
    }

    #[test]
    fn selection_is_written_through() {
        let cache = Arc::new(InMemoryAnswerCache::new());
        let mut store = AnswerStore::new(key(), cache.clone());
        store.restore(questions());

        store.record_selection(QuestionId::new(2), "C").unwrap();

        let snapshot = cache.load(&key()).unwrap().unwrap();
        assert_eq!(snapshot.selected(QuestionId::new(2)), Some("C"));
    }

    #[test]
    fn rejects_unknown_question_and_foreign_option() {
        let mut store = AnswerStore::new(key(), Arc::new(InMemoryAnswerCache::new()));
        store.restore(questions());

        assert_eq!(
            store.record_selection(QuestionId::new(9), "A"),
            Err(AnswerError::UnknownQuestion(QuestionId::new(9)))
        );
        assert!(store.record_selection(QuestionId::new(1), "Z").is_err());
        assert!(store.answers().is_empty());
    }

    #[test]
    fn first_skip_wins() {
        let mut store = AnswerStore::new(key(), Arc::new(InMemoryAnswerCache::new()));
        store.restore(questions());

        store.record_selection(QuestionId::new(1), "A").unwrap();
        assert!(!store.record_skip(QuestionId::new(1)).unwrap());
        assert!(store.record_skip(QuestionId::new(2)).unwrap());
        assert!(!store.record_skip(QuestionId::new(2)).unwrap());

        assert_eq!(store.get(QuestionId::new(1)), Answer::Selected("A".into()));
        assert_eq!(store.get(QuestionId::new(2)), Answer::Skipped);
    }

    #[test]
    fn restore_drops_entries_for_other_questions() {
        let cache = Arc::new(InMemoryAnswerCache::new());
        let mut old = AnswerStore::new(key(), cache.clone());
        old.restore(questions());
        old.record_selection(QuestionId::new(1), "B").unwrap();
        old.record_selection(QuestionId::new(3), "C").unwrap();

        let mut store = AnswerStore::new(key(), cache);
        let restored = store.restore(questions().into_iter().take(2).collect());

        assert_eq!(restored, 1);
        assert_eq!(store.answers().selected(QuestionId::new(1)), Some("B"));
    }

    #[test]
    fn finalize_all_fills_gaps_with_skipped() {
        let mut store = AnswerStore::new(key(), Arc::new(InMemoryAnswerCache::new()));
        store.restore(questions());
        store.record_selection(QuestionId::new(3), "A").unwrap();

        let done = store.finalize_all();
        assert_eq!(done.len(), 3);
        assert_eq!(done.get(QuestionId::new(1)), Some(&FinalAnswer::Skipped));
        assert_eq!(
            done.get(QuestionId::new(3)),
            Some(&FinalAnswer::Selected("A".into()))
        );
    }

    #[test]
    fn cache_failures_do_not_block_answers() {
        let mut store = AnswerStore::new(key(), Arc::new(BrokenCache));
        assert_eq!(store.restore(questions()), 0);

        store.record_selection(QuestionId::new(1), "A").unwrap();
        store.clear();

        assert_eq!(store.answers().selected(QuestionId::new(1)), Some("A"));
    }

    #[test]
    fn clear_removes_snapshot() {
        let cache = Arc::new(InMemoryAnswerCache::new());
        let mut store = AnswerStore::new(key(), cache.clone());
        store.restore(questions());
        store.record_selection(QuestionId::new(1), "A").unwrap();

        store.clear();
        assert!(cache.load(&key()).unwrap().is_none());
    }
}
