//! Calendar and timestamp sources.
//!
//! # Responsibility
//! - Supply "today" when no persisted current date exists.
//! - Supply creation timestamps for new tasks.
//!
//! # Invariants
//! - Day advancement never consults a clock; it is pure date arithmetic in
//!   `model::date::next_day`.

use crate::model::date::ListDate;
use chrono::Utc;

/// External calendar collaborator.
pub trait Clock {
    /// Current calendar day.
    fn today(&self) -> ListDate;
    /// Current Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;
}

/// Wall-clock source using the UTC calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> ListDate {
        Utc::now().date_naive()
    }

    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: ListDate,
    now_epoch_ms: i64,
}

impl FixedClock {
    /// Clock pinned to midnight UTC of `today`.
    pub fn new(today: ListDate) -> Self {
        let now_epoch_ms = today
            .and_hms_opt(0, 0, 0)
            .map_or(0, |midnight| midnight.and_utc().timestamp_millis());
        Self {
            today,
            now_epoch_ms,
        }
    }

    pub fn with_timestamp(today: ListDate, now_epoch_ms: i64) -> Self {
        Self {
            today,
            now_epoch_ms,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> ListDate {
        self.today
    }

    fn now_epoch_ms(&self) -> i64 {
        self.now_epoch_ms
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use crate::model::date::parse_list_date;

    #[test]
    fn fixed_clock_reports_midnight_of_its_day() {
        let clock = FixedClock::new(parse_list_date("2024-01-01").unwrap());
        assert_eq!(clock.now_epoch_ms(), 1_704_067_200_000);
        assert_eq!(clock.today(), parse_list_date("2024-01-01").unwrap());
    }
}
