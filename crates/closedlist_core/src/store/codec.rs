//! Typed decode/encode boundary for stored slot values.
//!
//! # Invariants
//! - `decode_slot` never fails; it tags whether the value came from storage
//!   or from the default.
//! - Values of the wrong JSON shape (e.g. an object where a sequence is
//!   expected) are reported as `Malformed`.
//! - A well-formed sequence is never discarded whole; only its unusable
//!   entries are dropped and counted.

use super::StoreResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Why a slot fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Key was never written.
    Missing,
    /// Key holds an empty or whitespace-only string.
    Empty,
    /// Stored text did not decode into the slot type.
    Malformed(String),
    /// The medium failed while reading.
    ReadFailed(String),
}

impl FallbackReason {
    /// Stable code for log lines; carries no stored content.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::Malformed(_) => "malformed",
            Self::ReadFailed(_) => "read_failed",
        }
    }
}

impl Display for FallbackReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Empty => f.write_str("empty"),
            Self::Malformed(details) => write!(f, "malformed: {details}"),
            Self::ReadFailed(details) => write!(f, "read_failed: {details}"),
        }
    }
}

/// Result of decoding one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    /// Value decoded from storage.
    Stored(T),
    /// Sequence decoded from storage with `dropped` unusable entries removed.
    Partial { value: T, dropped: usize },
    /// Default substituted for an unusable stored value.
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Decoded<T> {
    pub fn into_value(self) -> T {
        match self {
            Self::Stored(value) | Self::Partial { value, .. } | Self::Fallback { value, .. } => {
                value
            }
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Stored(_) | Self::Partial { .. } => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    /// Number of sequence entries dropped while decoding.
    pub fn dropped_entries(&self) -> usize {
        match self {
            Self::Partial { dropped, .. } => *dropped,
            Self::Stored(_) | Self::Fallback { .. } => 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Decodes raw stored text, substituting `default()` when unusable.
pub fn decode_slot<T: DeserializeOwned>(
    raw: Option<&str>,
    default: impl FnOnce() -> T,
) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::Fallback {
            value: default(),
            reason: FallbackReason::Missing,
        };
    };

    if raw.trim().is_empty() {
        return Decoded::Fallback {
            value: default(),
            reason: FallbackReason::Empty,
        };
    }

    match serde_json::from_str::<T>(raw) {
        Ok(value) => Decoded::Stored(value),
        Err(err) => Decoded::Fallback {
            value: default(),
            reason: FallbackReason::Malformed(err.to_string()),
        },
    }
}

/// Decodes a stored sequence entry by entry.
///
/// Falls back to `[]` only when the stored text is missing, blank or not a
/// JSON array. Array entries that do not decode as `T` are dropped.
pub fn decode_sequence<T: DeserializeOwned>(raw: Option<&str>) -> Decoded<Vec<T>> {
    let entries = match decode_slot::<Vec<serde_json::Value>>(raw, Vec::new) {
        Decoded::Stored(entries) | Decoded::Partial { value: entries, .. } => entries,
        Decoded::Fallback { reason, .. } => {
            return Decoded::Fallback {
                value: Vec::new(),
                reason,
            }
        }
    };

    let total = entries.len();
    let value: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    match total - value.len() {
        0 => Decoded::Stored(value),
        dropped => Decoded::Partial { value, dropped },
    }
}

/// Encodes a slot value to its stored JSON text.
pub fn encode_slot<T: Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(value)?)
}
