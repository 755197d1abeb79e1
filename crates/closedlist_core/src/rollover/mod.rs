//! Day-boundary transitions and in-day list edits as pure functions.
//!
//! # Responsibility
//! - Compute the next `LiveState` for end-of-day and its inverse.
//! - Compute replacement task sequences for add/toggle edits.
//!
//! # Invariants
//! - Functions here never perform I/O; callers commit the results.
//! - Only `engine` moves tasks between slots or touches history.

pub mod engine;
pub mod mutation;
