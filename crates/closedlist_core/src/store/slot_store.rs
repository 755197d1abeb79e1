//! Slot store: cached live state over a key-value medium.
//!
//! # Responsibility
//! - Load the four slots once per session with load-or-default semantics.
//! - Expose per-slot get/set plus an all-slot atomic commit.
//!
//! # Invariants
//! - `load` never fails and never panics.
//! - Cached values change only after the medium accepted the write.
//! - A date slot that fell back is pinned to storage on load, so the
//!   calendar is consulted at first initialization only.

use super::codec::{decode_sequence, decode_slot, encode_slot, Decoded, FallbackReason};
use super::kv::KeyValueStore;
use super::slot::Slot;
use super::StoreResult;
use crate::clock::Clock;
use crate::model::daily_list::DailyList;
use crate::model::date::{format_list_date, ListDate};
use crate::model::live_state::LiveState;
use crate::model::task::Task;
use log::{info, warn};
use std::time::Instant;

/// Which slots were replaced by defaults, or lost entries, while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    fallbacks: Vec<(Slot, FallbackReason)>,
    dropped: Vec<(Slot, usize)>,
}

impl LoadReport {
    /// `true` when every slot decoded from storage without dropping entries.
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty() && self.dropped.is_empty()
    }

    /// Entries dropped from a stored sequence, if any.
    pub fn dropped_for(&self, slot: Slot) -> Option<usize> {
        self.dropped
            .iter()
            .find(|(candidate, _)| *candidate == slot)
            .map(|(_, count)| *count)
    }

    pub fn fallbacks(&self) -> &[(Slot, FallbackReason)] {
        &self.fallbacks
    }

    pub fn reason_for(&self, slot: Slot) -> Option<&FallbackReason> {
        self.fallbacks
            .iter()
            .find(|(candidate, _)| *candidate == slot)
            .map(|(_, reason)| reason)
    }
}

/// Owner of the four persisted slots.
pub struct SlotStore<S: KeyValueStore> {
    kv: S,
    state: LiveState,
    report: LoadReport,
}

impl<S: KeyValueStore> SlotStore<S> {
    /// Loads every slot, substituting defaults for unusable values.
    ///
    /// # Side effects
    /// - Logs one `slot_load` event per fallback and a summary event.
    /// - Persists the resolved current date when that slot fell back.
    pub fn load(kv: S, clock: &impl Clock) -> Self {
        let started_at = Instant::now();
        let mut report = LoadReport::default();

        let current_day_tasks: Vec<Task> = load_slot(
            &kv,
            Slot::CurrentDayTasks,
            &mut report,
            decode_sequence::<Task>,
            Vec::new,
        );
        let tomorrow_inbox: Vec<Task> = load_slot(
            &kv,
            Slot::TomorrowInbox,
            &mut report,
            decode_sequence::<Task>,
            Vec::new,
        );
        let past_daily_lists: Vec<DailyList> = load_slot(
            &kv,
            Slot::PastDailyLists,
            &mut report,
            decode_sequence::<DailyList>,
            Vec::new,
        );
        let current_date: ListDate = load_slot(
            &kv,
            Slot::CurrentDate,
            &mut report,
            |raw| decode_slot(raw, || clock.today()),
            || clock.today(),
        );

        let store = Self {
            kv,
            state: LiveState {
                current_day_tasks,
                tomorrow_inbox,
                past_daily_lists,
                current_date,
            },
            report,
        };

        if store.report.reason_for(Slot::CurrentDate).is_some() {
            if let Err(err) = store.write_slot(Slot::CurrentDate, &store.state.current_date) {
                warn!(
                    "event=slot_pin_date module=store status=error date={} error={err}",
                    format_list_date(store.state.current_date)
                );
            }
        }

        info!(
            "event=slot_load module=store status=ok fallbacks={} dropped_slots={} current_date={} today_count={} inbox_count={} history_count={} duration_ms={}",
            store.report.fallbacks.len(),
            store.report.dropped.len(),
            format_list_date(store.state.current_date),
            store.state.current_day_tasks.len(),
            store.state.tomorrow_inbox.len(),
            store.state.past_daily_lists.len(),
            started_at.elapsed().as_millis()
        );
        store
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Full live state as currently committed.
    pub fn state(&self) -> &LiveState {
        &self.state
    }

    pub fn current_day_tasks(&self) -> &[Task] {
        &self.state.current_day_tasks
    }

    pub fn tomorrow_inbox(&self) -> &[Task] {
        &self.state.tomorrow_inbox
    }

    /// Archived days, most recent first.
    pub fn past_daily_lists(&self) -> &[DailyList] {
        &self.state.past_daily_lists
    }

    pub fn current_date(&self) -> ListDate {
        self.state.current_date
    }

    pub fn set_current_day_tasks(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        self.write_slot(Slot::CurrentDayTasks, &tasks)?;
        self.state.current_day_tasks = tasks;
        Ok(())
    }

    pub fn set_tomorrow_inbox(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        self.write_slot(Slot::TomorrowInbox, &tasks)?;
        self.state.tomorrow_inbox = tasks;
        Ok(())
    }

    pub fn set_past_daily_lists(&mut self, lists: Vec<DailyList>) -> StoreResult<()> {
        self.write_slot(Slot::PastDailyLists, &lists)?;
        self.state.past_daily_lists = lists;
        Ok(())
    }

    pub fn set_current_date(&mut self, date: ListDate) -> StoreResult<()> {
        self.write_slot(Slot::CurrentDate, &date)?;
        self.state.current_date = date;
        Ok(())
    }

    /// Replaces all four slots in one atomic write.
    pub fn commit(&mut self, next: LiveState) -> StoreResult<()> {
        let entries = [
            (
                Slot::CurrentDayTasks.key(),
                encode_slot(&next.current_day_tasks)?,
            ),
            (Slot::TomorrowInbox.key(), encode_slot(&next.tomorrow_inbox)?),
            (
                Slot::PastDailyLists.key(),
                encode_slot(&next.past_daily_lists)?,
            ),
            (Slot::CurrentDate.key(), encode_slot(&next.current_date)?),
        ];
        self.kv.write_batch(&entries)?;
        self.state = next;
        Ok(())
    }

    fn write_slot<T: serde::Serialize + ?Sized>(&self, slot: Slot, value: &T) -> StoreResult<()> {
        self.kv.write_batch(&[(slot.key(), encode_slot(value)?)])
    }
}

fn load_slot<T>(
    kv: &impl KeyValueStore,
    slot: Slot,
    report: &mut LoadReport,
    decode: impl FnOnce(Option<&str>) -> Decoded<T>,
    default: impl FnOnce() -> T,
) -> T {
    let decoded = match kv.read(slot.key()) {
        Ok(raw) => decode(raw.as_deref()),
        Err(err) => Decoded::Fallback {
            value: default(),
            reason: FallbackReason::ReadFailed(err.to_string()),
        },
    };

    if let Some(reason) = decoded.fallback_reason() {
        match reason {
            FallbackReason::Missing => info!(
                "event=slot_load module=store status=default slot={slot} reason={}",
                reason.code()
            ),
            _ => warn!(
                "event=slot_load module=store status=fallback slot={slot} reason={}",
                reason.code()
            ),
        }
        report.fallbacks.push((slot, reason.clone()));
    }

    let dropped = decoded.dropped_entries();
    if dropped > 0 {
        warn!("event=slot_load module=store status=partial slot={slot} dropped={dropped}");
        report.dropped.push((slot, dropped));
    }

    decoded.into_value()
}
