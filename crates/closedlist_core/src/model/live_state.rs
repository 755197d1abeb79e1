//! Composite value of the four persisted slots.

use crate::model::daily_list::DailyList;
use crate::model::date::ListDate;
use crate::model::task::Task;

/// Everything the rollover engine reads and writes in one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveState {
    /// Active day's list in display order.
    pub current_day_tasks: Vec<Task>,
    /// Tasks deferred to the next day.
    pub tomorrow_inbox: Vec<Task>,
    /// Archived days, most recent first.
    pub past_daily_lists: Vec<DailyList>,
    /// Active day.
    pub current_date: ListDate,
}

impl LiveState {
    /// Fresh state with no tasks and no history.
    pub fn empty(current_date: ListDate) -> Self {
        Self {
            current_day_tasks: Vec::new(),
            tomorrow_inbox: Vec::new(),
            past_daily_lists: Vec::new(),
            current_date,
        }
    }
}
