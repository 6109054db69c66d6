//! Persistence adapters for the task collection.
//!
//! Every save rewrites the whole collection; there are no incremental
//! writes. A missing file loads as an empty collection, an unreadable one
//! is an error and is never overwritten by `load`.

use crate::task::Task;
use log::{debug, info};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Default data file, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "Tasks.json";

/// Durable storage for the full task collection.
pub trait TaskStorage {
    /// Reads the stored collection, or an empty one on first run.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] when the backing store exists but
    /// cannot be read and [`StorageError::Corrupt`] when it cannot be parsed.
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replaces the stored collection with `tasks`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] or [`StorageError::Write`] when the
    /// collection could not be written.
    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not contain a valid task list: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

fn encode(tasks: &[Task]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(tasks).map_err(StorageError::Encode)
}

fn decode(path: &Path, data: &str) -> Result<Vec<Task>, StorageError> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(data).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Stores tasks as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_TASKS_FILE)
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no task file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let tasks = decode(&self.path, &data)?;
        info!("loaded {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = encode(tasks)?;
        fs::write(&self.path, data).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!("saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the serialized collection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Option<String>,
    fail_writes: bool,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document, as if read from disk.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail with a write error.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The last successfully saved document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn label() -> PathBuf {
        PathBuf::from("<memory>")
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        match &self.document {
            Some(data) => decode(&Self::label(), data),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = encode(tasks)?;
        if self.fail_writes {
            return Err(StorageError::Write {
                path: Self::label(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }
        self.document = Some(data);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn task_strategy() -> impl Strategy<Value = Task> {
        (
            1u32..10_000,
            "[A-Z0-9 ]{1,24}",
            "[A-Z ]{0,12}",
            any::<bool>(),
            (1970i32..2100, 1u32..=12, 1u32..=28),
            (0i64..4_000_000_000, 0u32..1_000_000_000),
        )
            .prop_map(|(id, title, assigned_to, completed, (y, m, d), (secs, nanos))| {
                Task::new(
                    id,
                    title,
                    assigned_to,
                    NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                    Local.timestamp_opt(secs, nanos).unwrap(),
                )
                .with_completed(completed)
            })
    }

    proptest! {
        #[test]
        fn memory_round_trip_preserves_tasks(tasks in prop::collection::vec(task_strategy(), 0..16)) {
            let mut storage = MemoryStorage::new();
            storage.save(&tasks).unwrap();
            prop_assert_eq!(storage.load().unwrap(), tasks);
        }

        #[test]
        fn file_round_trip_preserves_tasks(tasks in prop::collection::vec(task_strategy(), 0..16)) {
            let dir = tempfile::tempdir().unwrap();
            let mut storage = JsonFileStorage::new(dir.path().join("Tasks.json"));
            storage.save(&tasks).unwrap();
            prop_assert_eq!(storage.load().unwrap(), tasks);
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn default_file_is_in_working_directory() {
        assert_eq!(JsonFileStorage::default().path(), Path::new("Tasks.json"));
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());

        let err = storage.load().unwrap_err();

        match err {
            StorageError::Read { path, .. } => assert_eq!(path, storage.path()),
            other => panic!("expected a read error, got {other:?}"),
        }
    }

    #[test]
    fn blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tasks.json");
        fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStorage::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tasks.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStorage::new(&path).load().unwrap_err();

        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tasks.json");
        fs::write(&path, "stale contents that are much longer than an empty list").unwrap();

        JsonFileStorage::new(&path).save(&[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("nope").join("Tasks.json"));
        assert!(matches!(
            storage.save(&[]),
            Err(StorageError::Write { .. })
        ));
    }

    #[test]
    fn memory_storage_can_refuse_writes() {
        let mut storage = MemoryStorage::with_document("[]");
        storage.fail_writes(true);

        assert!(storage.save(&[]).is_err());
        assert_eq!(storage.saves(), 0);
        assert_eq!(storage.document(), Some("[]"));
    }
}
