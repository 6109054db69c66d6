//! Terminal task tracker: a JSON-backed task list driven by a line menu.

pub mod config;
pub mod console;
pub mod menu;
pub mod storage;
pub mod task;
pub mod task_store;

pub use config::Config;
pub use console::{Console, ScriptedConsole, TerminalConsole, Tone};
pub use menu::{main_menu_transition, Menu, Screen};
pub use storage::{JsonFileStorage, MemoryStorage, StorageError, TaskStorage};
pub use task::{parse_due_date, Task, ValidationError, DUE_DATE_FORMAT};
pub use task_store::{NotFoundError, Saved, TaskStore};
