//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::IdentityError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a question list could not be obtained. Terminal for the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("participant is not logged in")]
    Unauthorized,
    #[error("questions are unavailable: {0}")]
    Unavailable(String),
    #[error("no questions are configured")]
    Empty,
}

impl From<StorageError> for LoadError {
    fn from(err: StorageError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Why the gateway did not accept a submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission service unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for SubmitError {
    fn from(err: StorageError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Errors emitted by `LoginService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoginError {
    #[error("name and email are required")]
    MissingField,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<IdentityError> for LoginError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidEmail(raw) => Self::InvalidEmail(raw),
            _ => Self::MissingField,
        }
    }
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("incorrect admin password")]
    IncorrectPassword,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
