//! Core domain logic for closedlist, a daily task list with a closed-list
//! discipline: a fixed set of tasks per day, a side inbox for deferred work,
//! and an explicit end-of-day rollover with single-level revert.
//!
//! This crate is the single source of truth for those invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod rollover;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::daily_list::DailyList;
pub use model::date::{format_list_date, next_day, parse_list_date, ListDate, ListDateParseError};
pub use model::live_state::LiveState;
pub use model::task::{Task, TaskId, TaskValidationError};
pub use rollover::engine::{Rollover, RolloverSummary};
pub use service::day_service::{DayService, MutationOutcome, RejectReason, RevertOutcome};
pub use store::codec::{Decoded, FallbackReason};
pub use store::kv::{KeyValueStore, SqliteKeyValueStore};
pub use store::slot::Slot;
pub use store::slot_store::{LoadReport, SlotStore};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
