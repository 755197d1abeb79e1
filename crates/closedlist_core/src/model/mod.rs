//! Domain model for the closed daily list.
//!
//! # Responsibility
//! - Define the task record, the archived day snapshot and the live state.
//! - Keep calendar-day arithmetic in one place.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` that survives rollovers.
//! - Archived days are never mutated after they enter history.

pub mod daily_list;
pub mod date;
pub mod live_state;
pub mod task;
