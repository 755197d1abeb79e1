//! Slot names and their storage keys.

use std::fmt::{Display, Formatter};

/// One independently persisted piece of live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    CurrentDayTasks,
    TomorrowInbox,
    PastDailyLists,
    CurrentDate,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::CurrentDayTasks,
        Slot::TomorrowInbox,
        Slot::PastDailyLists,
        Slot::CurrentDate,
    ];

    /// Key under which the slot is stored in the key-value medium.
    pub fn key(self) -> &'static str {
        match self {
            Self::CurrentDayTasks => "currentTasks",
            Self::TomorrowInbox => "tomorrowInbox",
            Self::PastDailyLists => "pastLists",
            Self::CurrentDate => "currentDate",
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
