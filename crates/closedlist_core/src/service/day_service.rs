//! Daily list use-case service.
//!
//! # Responsibility
//! - Expose add/toggle operations within the active day.
//! - Expose end-of-day rollover, revert and reset across day boundaries.
//! - Report validated no-ops as outcomes instead of errors.
//!
//! # Invariants
//! - In-day operations write only the today or inbox slot.
//! - Day-boundary operations compute the full next state from one snapshot
//!   and commit all four slots together.
//! - The only errors surfaced are store write failures.

use crate::clock::Clock;
use crate::model::daily_list::DailyList;
use crate::model::date::{format_list_date, ListDate};
use crate::model::live_state::LiveState;
use crate::model::task::{Task, TaskId};
use crate::rollover::engine::{self, RolloverSummary};
use crate::rollover::mutation::{self, append_task, prepend_task};
use crate::store::kv::KeyValueStore;
use crate::store::slot_store::SlotStore;
use crate::store::StoreResult;
use log::{info, warn};

/// Why an operation was accepted as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Task text was empty or whitespace only.
    EmptyText,
    /// No task in today's list has the requested id.
    TaskNotFound,
}

impl RejectReason {
    fn code(self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::TaskNotFound => "task_not_found",
        }
    }
}

/// Outcome of an in-day operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed; carries the affected task id.
    Applied(TaskId),
    /// Nothing changed.
    Rejected(RejectReason),
}

impl MutationOutcome {
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            Self::Applied(id) => Some(id),
            Self::Rejected(_) => None,
        }
    }
}

/// Outcome of `revert_to_previous_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The most recent archived day is active again.
    Reverted { restored_date: ListDate },
    /// History was empty; nothing changed.
    NothingToRevert,
}

/// Where a new task lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    TodayEnd,
    TodayFront,
    InboxEnd,
}

impl Placement {
    fn as_str(self) -> &'static str {
        match self {
            Self::TodayEnd => "today",
            Self::TodayFront => "today_urgent",
            Self::InboxEnd => "inbox",
        }
    }
}

/// Facade over the slot store for one session.
pub struct DayService<S: KeyValueStore, C: Clock> {
    store: SlotStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> DayService<S, C> {
    /// Loads persisted state (falling back to defaults) and wraps it.
    pub fn new(kv: S, clock: C) -> Self {
        let store = SlotStore::load(kv, &clock);
        Self { store, clock }
    }

    /// Read access to the underlying slots.
    pub fn store(&self) -> &SlotStore<S> {
        &self.store
    }

    pub fn current_day_tasks(&self) -> &[Task] {
        self.store.current_day_tasks()
    }

    pub fn tomorrow_inbox(&self) -> &[Task] {
        self.store.tomorrow_inbox()
    }

    pub fn current_date(&self) -> ListDate {
        self.store.current_date()
    }

    /// Archived days, most recent first.
    pub fn history(&self) -> &[DailyList] {
        self.store.past_daily_lists()
    }

    /// Most recent archived entry for `date`.
    ///
    /// Revert followed by another end-of-day can archive the same date
    /// twice; the newest entry wins.
    pub fn past_list(&self, date: ListDate) -> Option<&DailyList> {
        self.history().iter().find(|list| list.date == date)
    }

    /// Owned copy of all four slots.
    pub fn snapshot(&self) -> LiveState {
        self.store.state().clone()
    }

    /// Appends a task to the end of today's list.
    pub fn add_task(&mut self, text: &str) -> StoreResult<MutationOutcome> {
        self.insert_task(text, Placement::TodayEnd)
    }

    /// Appends a task to tomorrow's inbox.
    pub fn add_task_to_inbox(&mut self, text: &str) -> StoreResult<MutationOutcome> {
        self.insert_task(text, Placement::InboxEnd)
    }

    /// Inserts an urgent task at the front of today's list.
    pub fn add_urgent_task(&mut self, text: &str) -> StoreResult<MutationOutcome> {
        self.insert_task(text, Placement::TodayFront)
    }

    /// Flips completion of one task in today's list.
    pub fn toggle_task(&mut self, id: &TaskId) -> StoreResult<MutationOutcome> {
        let Some(next) = mutation::toggle_task(self.store.current_day_tasks(), id) else {
            info!(
                "event=task_toggle module=service status=noop reason={} task_id={id}",
                RejectReason::TaskNotFound.code()
            );
            return Ok(MutationOutcome::Rejected(RejectReason::TaskNotFound));
        };

        self.store.set_current_day_tasks(next)?;
        info!("event=task_toggle module=service status=ok task_id={id}");
        Ok(MutationOutcome::Applied(id.clone()))
    }

    /// Archives the active day and starts the next one.
    ///
    /// On the last representable date the day is archived but the date does
    /// not move; `RolloverSummary::date_advanced` is `false` in that case.
    pub fn end_of_day(&mut self) -> StoreResult<RolloverSummary> {
        let rollover = engine::end_of_day(self.store.state());
        let summary = rollover.summary;

        if let Err(err) = self.store.commit(rollover.next) {
            warn!(
                "event=end_of_day module=service status=error date={} error={err}",
                format_list_date(summary.closed_date)
            );
            return Err(err);
        }

        if !summary.date_advanced {
            warn!(
                "event=end_of_day module=service status=date_overflow date={}",
                format_list_date(summary.closed_date)
            );
        }
        info!(
            "event=end_of_day module=service status=ok closed_date={} next_date={} carried_over={} promoted_from_inbox={} completed={}",
            format_list_date(summary.closed_date),
            format_list_date(summary.next_date),
            summary.carried_over,
            summary.promoted_from_inbox,
            summary.completed
        );
        Ok(summary)
    }

    /// Makes the most recent archived day active again.
    ///
    /// An empty history is a logged no-op.
    pub fn revert_to_previous_day(&mut self) -> StoreResult<RevertOutcome> {
        let Some(previous) = engine::revert_to_previous_day(self.store.state()) else {
            warn!("event=revert_day module=service status=noop reason=empty_history");
            return Ok(RevertOutcome::NothingToRevert);
        };

        let restored_date = previous.current_date;
        let discarded_date = self.store.current_date();
        self.store.commit(previous)?;

        info!(
            "event=revert_day module=service status=ok restored_date={} discarded_date={} history_count={}",
            format_list_date(restored_date),
            format_list_date(discarded_date),
            self.store.past_daily_lists().len()
        );
        Ok(RevertOutcome::Reverted { restored_date })
    }

    /// Clears tasks and history and restarts at the calendar's today.
    pub fn reset(&mut self) -> StoreResult<()> {
        let today = self.clock.today();
        self.store.commit(LiveState::empty(today))?;
        info!(
            "event=reset module=service status=ok current_date={}",
            format_list_date(today)
        );
        Ok(())
    }

    fn insert_task(&mut self, text: &str, placement: Placement) -> StoreResult<MutationOutcome> {
        let mut task = match Task::new(text, self.clock.now_epoch_ms()) {
            Ok(task) => task,
            // Generated ids are never blank, so blank text is the only rejection.
            Err(_) => {
                info!(
                    "event=task_add module=service status=noop target={} reason={}",
                    placement.as_str(),
                    RejectReason::EmptyText.code()
                );
                return Ok(MutationOutcome::Rejected(RejectReason::EmptyText));
            }
        };
        task.is_urgent = placement == Placement::TodayFront;
        task.list_date = Some(self.store.current_date());
        let id = task.id.clone();

        match placement {
            Placement::TodayEnd => {
                let next = append_task(self.store.current_day_tasks(), task);
                self.store.set_current_day_tasks(next)?;
            }
            Placement::TodayFront => {
                let next = prepend_task(self.store.current_day_tasks(), task);
                self.store.set_current_day_tasks(next)?;
            }
            Placement::InboxEnd => {
                let next = append_task(self.store.tomorrow_inbox(), task);
                self.store.set_tomorrow_inbox(next)?;
            }
        }

        info!(
            "event=task_add module=service status=ok target={} task_id={id}",
            placement.as_str()
        );
        Ok(MutationOutcome::Applied(id))
    }
}
