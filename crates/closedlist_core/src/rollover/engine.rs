//! End-of-day rollover and single-level revert.
//!
//! # Invariants
//! - `end_of_day` prepends exactly one `DailyList` to history.
//! - Every task identity from today + inbox survives in either the new
//!   archive entry or the next day's list, never duplicated in live state.
//! - `revert_to_previous_day` only ever reads and removes the history head.

use crate::model::daily_list::DailyList;
use crate::model::date::{next_day, ListDate};
use crate::model::live_state::LiveState;

/// Counts describing one end-of-day transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverSummary {
    pub closed_date: ListDate,
    pub next_date: ListDate,
    /// `false` when `closed_date` has no successor and the date stayed put.
    pub date_advanced: bool,
    /// Unfinished tasks carried from the closed day.
    pub carried_over: usize,
    /// Inbox tasks promoted onto the new day.
    pub promoted_from_inbox: usize,
    /// Completed tasks that left live state.
    pub completed: usize,
}

/// Result of `end_of_day`: the state to commit and its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover {
    pub next: LiveState,
    pub summary: RolloverSummary,
}

/// Closes the active day.
///
/// The next list is today's unfinished tasks in order followed by the inbox
/// in order; the inbox is emptied and the date advances by one calendar day.
pub fn end_of_day(state: &LiveState) -> Rollover {
    let archived = DailyList::new(
        state.current_date,
        state.current_day_tasks.clone(),
        state.tomorrow_inbox.clone(),
    );

    let mut next_tasks: Vec<_> = state
        .current_day_tasks
        .iter()
        .filter(|task| task.is_open())
        .cloned()
        .collect();
    let carried_over = next_tasks.len();
    next_tasks.extend(state.tomorrow_inbox.iter().cloned());

    let mut past_daily_lists = Vec::with_capacity(state.past_daily_lists.len() + 1);
    past_daily_lists.push(archived);
    past_daily_lists.extend(state.past_daily_lists.iter().cloned());

    let successor = next_day(state.current_date);
    let next_date = successor.unwrap_or(state.current_date);
    let summary = RolloverSummary {
        closed_date: state.current_date,
        next_date,
        date_advanced: successor.is_some(),
        carried_over,
        promoted_from_inbox: state.tomorrow_inbox.len(),
        completed: state.current_day_tasks.len() - carried_over,
    };

    Rollover {
        next: LiveState {
            current_day_tasks: next_tasks,
            tomorrow_inbox: Vec::new(),
            past_daily_lists,
            current_date: next_date,
        },
        summary,
    }
}

/// Restores the most recent archived day as the active day.
///
/// Returns `None` when history is empty. Edits made after the matching
/// `end_of_day` are discarded: the archived lists replace live state.
pub fn revert_to_previous_day(state: &LiveState) -> Option<LiveState> {
    let (latest, older) = state.past_daily_lists.split_first()?;
    Some(LiveState {
        current_day_tasks: latest.tasks.clone(),
        tomorrow_inbox: latest.tomorrow_inbox.clone(),
        past_daily_lists: older.to_vec(),
        current_date: latest.date,
    })
}
