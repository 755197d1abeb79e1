//! Plain-text rendering of lists for the terminal.

use closedlist_core::{
    Clock, DailyList, DayService, KeyValueStore, RolloverSummary, Task, TaskId,
};
use std::fmt::Write;

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &TaskId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn live_lists<S: KeyValueStore, C: Clock>(service: &DayService<S, C>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", service.current_date());
    push_tasks(&mut out, service.current_day_tasks(), true);
    let _ = writeln!(out, "Inbox:");
    push_inbox(&mut out, service.tomorrow_inbox());
    out
}

pub fn toggled<S: KeyValueStore, C: Clock>(service: &DayService<S, C>, id: &TaskId) -> String {
    service
        .current_day_tasks()
        .iter()
        .find(|task| &task.id == id)
        .map(|task| {
            let state = if task.completed { "done" } else { "open" };
            format!("{} is now {state}.\n", short_id(id))
        })
        .unwrap_or_default()
}

pub fn rollover_summary(summary: &RolloverSummary) -> String {
    let mut out = format!(
        "Closed {}: {} completed, {} carried over, {} from inbox.\n",
        summary.closed_date, summary.completed, summary.carried_over, summary.promoted_from_inbox
    );
    if !summary.date_advanced {
        let _ = writeln!(
            out,
            "{} is the last supported date; the date did not change.",
            summary.next_date
        );
    }
    out
}

pub fn daily_list(list: &DailyList) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}/{} done)",
        list.date,
        list.completed_count(),
        list.tasks.len()
    );
    push_tasks(&mut out, &list.tasks, false);
    let _ = writeln!(out, "  Inbox:");
    push_inbox(&mut out, &list.tomorrow_inbox);
    out
}

pub fn history(lists: &[DailyList]) -> String {
    if lists.is_empty() {
        return "No history yet.\n".to_string();
    }
    lists.iter().map(daily_list).collect::<Vec<_>>().join("\n")
}

fn push_tasks(out: &mut String, tasks: &[Task], numbered: bool) {
    if tasks.is_empty() {
        let _ = writeln!(out, "  (no tasks)");
        return;
    }
    for (index, task) in tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        let urgent = if task.is_urgent { "! " } else { "" };
        if numbered {
            let _ = writeln!(
                out,
                "  {:>2}. [{mark}] {} {urgent}{}",
                index + 1,
                short_id(&task.id),
                task.text
            );
        } else {
            let _ = writeln!(out, "  [{mark}] {urgent}{}", task.text);
        }
    }
}

fn push_inbox(out: &mut String, tasks: &[Task]) {
    if tasks.is_empty() {
        let _ = writeln!(out, "  (empty)");
        return;
    }
    for task in tasks {
        let _ = writeln!(out, "  - {}", task.text);
    }
}
