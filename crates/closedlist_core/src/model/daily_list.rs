//! Archived snapshot of one closed day.
//!
//! # Invariants
//! - A `DailyList` is created only by the end-of-day transition.
//! - Entries in history are never edited, only removed whole by revert.

use crate::model::date::ListDate;
use crate::model::task::{deserialize_task_list, Task};
use serde::{Deserialize, Serialize};

/// The final state of a day as it stood at end-of-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyList {
    /// Day that was closed.
    pub date: ListDate,
    /// Today's tasks in display order, completed ones included.
    #[serde(default, deserialize_with = "deserialize_task_list")]
    pub tasks: Vec<Task>,
    /// Tasks that had been deferred into the inbox during that day.
    #[serde(default, deserialize_with = "deserialize_task_list")]
    pub tomorrow_inbox: Vec<Task>,
}

impl DailyList {
    pub fn new(date: ListDate, tasks: Vec<Task>, tomorrow_inbox: Vec<Task>) -> Self {
        Self {
            date,
            tasks,
            tomorrow_inbox,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }
}
