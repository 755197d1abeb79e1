//! Calendar day helpers for `YYYY-MM-DD` list dates.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Calendar day a list belongs to. Serialized as `YYYY-MM-DD`.
pub type ListDate = NaiveDate;

const LIST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returned when text is not a valid `YYYY-MM-DD` calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDateParseError(pub String);

impl Display for ListDateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid list date `{}`; expected YYYY-MM-DD", self.0)
    }
}

impl Error for ListDateParseError {}

/// Parses a `YYYY-MM-DD` string.
pub fn parse_list_date(value: &str) -> Result<ListDate, ListDateParseError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, LIST_DATE_FORMAT)
        .map_err(|_| ListDateParseError(trimmed.to_string()))
}

/// Formats a list date as `YYYY-MM-DD`.
pub fn format_list_date(date: ListDate) -> String {
    date.format(LIST_DATE_FORMAT).to_string()
}

/// Returns the calendar day after `date`.
///
/// Pure date arithmetic, independent of wall-clock time. `None` only for the
/// last representable day.
pub fn next_day(date: ListDate) -> Option<ListDate> {
    date.succ_opt()
}
