//! Local, best-effort snapshot of in-progress answers.
//!
//! The cache exists only so a participant can reload the app mid-test without
//! losing answers. It is never the source of truth once a session holds a live
//! answer map, and callers are expected to log and ignore its errors.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use exam_core::model::{AnswerMap, Email};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] io::Error),

    #[error("cache snapshot is unreadable: {0}")]
    Corrupt(String),

    #[error("cache lock poisoned")]
    Poisoned,
}

/// Snapshot store keyed by participant email.
///
/// Writes are blocking; the session calls them inline on every answer change.
pub trait AnswerCache: Send + Sync {
    /// # Errors
    ///
    /// Returns `CacheError` when the snapshot exists but cannot be read.
    fn load(&self, key: &Email) -> Result<Option<AnswerMap>, CacheError>;

    /// # Errors
    ///
    /// Returns `CacheError` when the snapshot cannot be written.
    fn save(&self, key: &Email, answers: &AnswerMap) -> Result<(), CacheError>;

    /// Remove the snapshot. Removing a missing snapshot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` when an existing snapshot cannot be removed.
    fn clear(&self, key: &Email) -> Result<(), CacheError>;
}

/// Process-local cache, used by tests and when no cache directory is configured.
#[derive(Clone, Default)]
pub struct InMemoryAnswerCache {
    snapshots: Arc<Mutex<HashMap<Email, AnswerMap>>>,
}

impl InMemoryAnswerCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnswerCache for InMemoryAnswerCache {
    fn load(&self, key: &Email) -> Result<Option<AnswerMap>, CacheError> {
        let guard = self.snapshots.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &Email, answers: &AnswerMap) -> Result<(), CacheError> {
        let mut guard = self.snapshots.lock().map_err(|_| CacheError::Poisoned)?;
        guard.insert(key.clone(), answers.clone());
        Ok(())
    }

    fn clear(&self, key: &Email) -> Result<(), CacheError> {
        let mut guard = self.snapshots.lock().map_err(|_| CacheError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// One JSON file per participant inside `dir`.
///
/// File names are the hex-encoded email so distinct addresses never collide.
/// Writes go to a `.tmp` sibling first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileAnswerCache {
    dir: PathBuf,
}

impl FileAnswerCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &Email) -> PathBuf {
        let encoded: String = key
            .as_str()
            .bytes()
            .map(|byte| format!("{byte:02x}"))
            .collect();
        self.dir.join(format!("{encoded}.json"))
    }
}

impl AnswerCache for FileAnswerCache {
    fn load(&self, key: &Email) -> Result<Option<AnswerMap>, CacheError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| CacheError::Corrupt(err.to_string()))
    }

    fn save(&self, key: &Email, answers: &AnswerMap) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let json =
            serde_json::to_string(answers).map_err(|err| CacheError::Corrupt(err.to_string()))?;
        write_atomic(&path, json.as_bytes())?;
        Ok(())
    }

    fn clear(&self, key: &Email) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let result = (|| {
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
