//! In-day edits of the today and inbox sequences.
//!
//! These never touch history or the current date.

use crate::model::task::{Task, TaskId};

/// Returns `tasks` with `task` appended at the end.
pub fn append_task(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(task);
    next
}

/// Returns `tasks` with `task` inserted at the front.
pub fn prepend_task(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(task);
    next.extend_from_slice(tasks);
    next
}

/// Returns `tasks` with the completion flag of `id` flipped.
///
/// Returns `None` when no task matches. At most one task changes; order and
/// every other task are preserved.
pub fn toggle_task(tasks: &[Task], id: &TaskId) -> Option<Vec<Task>> {
    let position = tasks.iter().position(|task| &task.id == id)?;
    let mut next = tasks.to_vec();
    next[position].toggle_completed();
    Some(next)
}
