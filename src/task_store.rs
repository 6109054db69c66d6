use crate::storage::{StorageError, TaskStorage};
use crate::task::{parse_due_date, Task, ValidationError};
use chrono::{DateTime, Local};
use log::{debug, error};
use thiserror::Error;

/// No task with the requested ID exists.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Task {0} not found")]
pub struct NotFoundError(pub u32);

/// Result of a mutation together with the outcome of flushing it to storage.
///
/// A failed flush does not roll the mutation back; the task list stays
/// changed in memory and the caller decides how to report it.
#[derive(Debug)]
#[must_use]
pub struct Saved<T> {
    pub value: T,
    pub flush: Result<(), StorageError>,
}

impl<T> Saved<T> {
    pub fn into_parts(self) -> (T, Result<(), StorageError>) {
        (self.value, self.flush)
    }
}

/// Owns the task list and keeps the storage in sync with it.
///
/// A new task gets one more than the highest listed ID, so it never shares
/// an ID with a listed task. Without deletions this is `len + 1`.
#[derive(Debug)]
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    storage: S,
}

impl<S: TaskStorage> TaskStore<S> {
    /// Loads the stored tasks.
    ///
    /// # Errors
    ///
    /// Propagates any [`StorageError`] from [`TaskStorage::load`].
    pub fn open(storage: S) -> Result<Self, StorageError> {
        let tasks = storage.load()?;
        Ok(Self { tasks, storage })
    }

    pub fn create(
        &mut self,
        title: &str,
        assigned_to: &str,
        due_date: &str,
    ) -> Result<Saved<Task>, ValidationError> {
        self.create_at(title, assigned_to, due_date, Local::now())
    }

    /// Like [`TaskStore::create`] with an explicit creation time.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyTitle`] for a blank title,
    /// [`ValidationError::BadDate`] when `due_date` is not `Mon DD, YYYY` and
    /// [`ValidationError::TooManyTasks`] once `u32::MAX` is listed. Nothing
    /// is stored in any of these cases.
    pub fn create_at(
        &mut self,
        title: &str,
        assigned_to: &str,
        due_date: &str,
        created_at: DateTime<Local>,
    ) -> Result<Saved<Task>, ValidationError> {
        let title = title.trim().to_uppercase();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let assigned_to = assigned_to.trim().to_uppercase();
        let due_date = parse_due_date(due_date)?;

        let id = self.next_id().ok_or(ValidationError::TooManyTasks)?;
        let task = Task::new(id, title, assigned_to, due_date, created_at);
        self.tasks.push(task.clone());
        debug!("created task {id}");

        Ok(Saved {
            value: task,
            flush: self.flush(),
        })
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Removes the first task with `id`, keeping the others in order.
    ///
    /// # Errors
    ///
    /// [`NotFoundError`] when no listed task has `id`; nothing changes.
    pub fn delete_by_id(&mut self, id: u32) -> Result<Saved<Task>, NotFoundError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(NotFoundError(id))?;
        let task = self.tasks.remove(index);
        debug!("deleted task {id}");

        Ok(Saved {
            value: task,
            flush: self.flush(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn next_id(&self) -> Option<u32> {
        self.tasks
            .iter()
            .map(Task::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        let result = self.storage.save(&self.tasks);
        if let Err(err) = &result {
            error!("failed to save tasks: {err}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> TaskStore<MemoryStorage> {
        TaskStore::open(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn create_normalizes_input() {
        let mut store = store();
        let task = store
            .create("  buy milk ", " bob", "Dec 25, 2024")
            .unwrap()
            .value;

        assert_eq!(task.id(), 1);
        assert_eq!(task.title(), "BUY MILK");
        assert_eq!(task.assigned_to(), "BOB");
        assert!(!task.is_completed());
        assert_eq!(store.list(), &[task]);
    }

    #[test]
    fn create_rejects_blank_title() {
        let mut store = store();
        assert_eq!(
            store.create("   ", "", "Dec 25, 2024").unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert!(store.is_empty());
        assert_eq!(store.storage().saves(), 0);
    }

    #[test]
    fn every_mutation_is_flushed() {
        let mut store = store();
        store.create("a", "", "Jan 01, 2025").unwrap().flush.unwrap();
        store.create("b", "", "Jan 02, 2025").unwrap().flush.unwrap();
        store.delete_by_id(1).unwrap().flush.unwrap();

        assert_eq!(store.storage().saves(), 3);
        let saved = store.storage().load().unwrap();
        assert_eq!(saved, store.list());
    }

    #[test]
    fn failed_flush_keeps_the_mutation() {
        let mut store = store();
        store.storage_mut().fail_writes(true);

        let (task, flush) = store.create("a", "", "Jan 01, 2025").unwrap().into_parts();

        assert!(matches!(flush, Err(StorageError::Write { .. })));
        assert_eq!(store.list(), &[task]);
    }

    #[test]
    fn new_ids_never_reuse_a_listed_id() {
        let mut store = store();
        for title in ["a", "b", "c"] {
            store.create(title, "", "Jan 01, 2025").unwrap().flush.unwrap();
        }
        store.delete_by_id(1).unwrap().flush.unwrap();

        let task = store.create("d", "", "Jan 01, 2025").unwrap().value;

        assert_eq!(task.id(), 4);
        let ids: Vec<u32> = store.list().iter().map(Task::id).collect();
        assert_eq!(ids, [2, 3, 4]);

        let removed = store.delete_by_id(3).unwrap().value;
        assert_eq!(removed.title(), "C");
        assert!(store.list().iter().all(|t| t.id() != 3));
    }

    #[test]
    fn ids_continue_after_loaded_tasks() {
        let mut seeded = store();
        for title in ["a", "b", "c"] {
            seeded.create(title, "", "Jan 01, 2025").unwrap().flush.unwrap();
        }
        seeded.delete_by_id(2).unwrap().flush.unwrap();
        let document = seeded.storage().document().unwrap().to_owned();

        let mut store = TaskStore::open(MemoryStorage::with_document(document)).unwrap();
        let task = store.create("d", "", "Jan 01, 2025").unwrap().value;

        assert_eq!(task.id(), 4);
    }

    #[test]
    fn create_fails_when_ids_run_out() {
        let document = format!(
            r#"[{{"ID": {}, "Title": "LAST", "AssignedTo": "", "Status": false,
                "DueDate": "2025-01-01", "TimeCreated": "2025-01-01T00:00:00Z"}}]"#,
            u32::MAX
        );
        let mut store = TaskStore::open(MemoryStorage::with_document(document)).unwrap();

        assert_eq!(
            store.create("one more", "", "Jan 01, 2025").unwrap_err(),
            ValidationError::TooManyTasks
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.storage().saves(), 0);
    }
}
