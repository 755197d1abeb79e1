//! Task domain model.
//!
//! # Responsibility
//! - Define the unit of work that moves between today's list, the inbox and
//!   archived days.
//! - Validate user-supplied content at creation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is never blank for tasks created through `Task::new`.
//! - `is_urgent` is fixed at creation.

use crate::model::date::ListDate;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable, opaque identifier of a task across rollovers and archive
/// snapshots.
///
/// New ids are UUID v4 text, but any non-blank string read back from storage
/// is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh globally-unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation errors for task construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace only.
    EmptyText,
    /// Id is empty or whitespace only.
    BlankId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
            Self::BlankId => write!(f, "task id must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// One entry of a daily list.
///
/// Serialized with camelCase field names so stored slot values keep the
/// established wire shape (`isUrgent`, `createdAt`, `listDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// User-supplied content, stored as entered.
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Set only by the urgent insertion path.
    #[serde(default)]
    pub is_urgent: bool,
    /// Unix epoch milliseconds. Audit only, never used for ordering.
    #[serde(default)]
    pub created_at: i64,
    /// Day the task was created on. Not rewritten by rollover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_date: Option<ListDate>,
}

impl Task {
    /// Creates an open, non-urgent task with a generated stable ID.
    ///
    /// # Errors
    /// - `EmptyText` when `text` trims to nothing.
    pub fn new(text: impl Into<String>, created_at: i64) -> Result<Self, TaskValidationError> {
        Self::with_id(TaskId::generate(), text, created_at)
    }

    /// Creates a task with a caller-provided ID.
    ///
    /// # Errors
    /// - `BlankId` when `id` is empty or whitespace only.
    /// - `EmptyText` when `text` trims to nothing.
    pub fn with_id(
        id: TaskId,
        text: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: text.into(),
            completed: false,
            is_urgent: false,
            created_at,
            list_date: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks creation invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(TaskValidationError::BlankId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Returns whether this task still needs work.
    pub fn is_open(&self) -> bool {
        !self.completed
    }
}

/// Deserializes a task sequence entry by entry.
///
/// `null` reads as empty. Entries that are not well-formed tasks are dropped
/// and counted in a warning instead of failing the enclosing value.
pub(crate) fn deserialize_task_list<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = entries.len();
    let tasks: Vec<Task> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if tasks.len() < total {
        warn!(
            "event=task_list_decode module=model status=partial dropped={} kept={}",
            total - tasks.len(),
            tasks.len()
        );
    }
    Ok(tasks)
}
