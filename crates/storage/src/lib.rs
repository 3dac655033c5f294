#![forbid(unsafe_code)]

pub mod answer_cache;
pub mod question_bank;
pub mod repository;
pub mod sqlite;

pub use answer_cache::{AnswerCache, CacheError, FileAnswerCache, InMemoryAnswerCache};
pub use repository::{
    InMemoryRepository, QuestionRepository, Storage, StorageError, SubmissionRepository,
    UserRepository,
};
