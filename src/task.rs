//! The task record and its due-date format.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Input and display format for due dates, e.g. `Dec 25, 2024`.
pub const DUE_DATE_FORMAT: &str = "%b %d, %Y";

/// Human-readable example of [`DUE_DATE_FORMAT`] used in prompts.
pub const DUE_DATE_EXAMPLE: &str = "Dec 25, 2024";

/// Errors raised while validating user input for a new task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The due date does not match [`DUE_DATE_FORMAT`].
    #[error("due date '{0}' is not in the format Mon DD, YYYY (e.g. Dec 25, 2024)")]
    BadDate(String),

    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Every task ID up to `u32::MAX` is taken.
    #[error("no task ID left to assign")]
    TooManyTasks,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "AssignedTo")]
    assigned_to: String,
    #[serde(rename = "Status")]
    completed: bool,
    #[serde(rename = "DueDate", deserialize_with = "deserialize_due_date")]
    due_date: NaiveDate,
    #[serde(rename = "TimeCreated")]
    created_at: DateTime<Local>,
}

impl Task {
    /// Builds an open task. Only the store hands these out.
    pub(crate) fn new(
        id: u32,
        title: String,
        assigned_to: String,
        due_date: NaiveDate,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            title,
            assigned_to,
            completed: false,
            due_date,
            created_at,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn assigned_to(&self) -> &str {
        &self.assigned_to
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Short `id. title` line shown on the main menu.
    pub fn menu_line(&self) -> String {
        format!("{}. {}", self.id, self.title)
    }

    /// Multi-line card shown after a task is added.
    pub fn details(&self) -> String {
        format!(
            "ID: {}\nTitle: {}\nAssigned To: {}\nDue Date: {}\nTime Created: {}",
            self.id,
            self.title,
            self.assigned_to,
            self.due_date.format(DUE_DATE_FORMAT),
            self.created_at.format(DUE_DATE_FORMAT),
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Assigned To: {}, Due Date: {}",
            self.id,
            self.title,
            self.assigned_to,
            self.due_date.format(DUE_DATE_FORMAT)
        )
    }
}

/// Parses a due date typed by the user.
///
/// Only the exact `Mon DD, YYYY` shape is accepted: a two-digit day, a
/// four-digit year and single spaces. Surrounding whitespace is ignored.
pub fn parse_due_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    let bad_date = || ValidationError::BadDate(text.to_owned());
    if !has_due_date_shape(text) {
        return Err(bad_date());
    }
    NaiveDate::parse_from_str(text, DUE_DATE_FORMAT).map_err(|_| bad_date())
}

// chrono accepts one-digit days, short or signed years and loose spacing.
fn has_due_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == DUE_DATE_EXAMPLE.len()
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3] == b' '
        && bytes[4..6].iter().all(u8::is_ascii_digit)
        && &bytes[6..8] == b", "
        && bytes[8..].iter().all(u8::is_ascii_digit)
}

// Older data files store the due date as a full RFC 3339 timestamp at midnight.
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(serde::de::Error::custom)
}
