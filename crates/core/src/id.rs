//! Strongly-typed identifiers used across the domain.
//!
//! Ledgers are identified by UUIDv7. Line items and participants get small
//! sequential ids allocated by their ledger: they are never reused, so a
//! membership link keyed by ids stays valid regardless of display order.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a split ledger (one editing session over one receipt).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerId(Uuid);

impl LedgerId {
    /// Create a new, time-ordered (UUIDv7) identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for LedgerId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LedgerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("LedgerId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Identifier of a line item within its ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(u64);

/// Identifier of a participant within its ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

macro_rules! impl_seq_newtype {
    ($t:ty, $prefix:literal) => {
        impl $t {
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            /// Accepts both the display form (`item-3`) and a bare number (`3`).
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .strip_prefix(concat!($prefix, "-"))
                    .unwrap_or(s);
                digits
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $prefix, e)))
            }
        }
    };
}

impl_seq_newtype!(LineItemId, "item");
impl_seq_newtype!(ParticipantId, "participant");

/// Monotonic id allocator.
///
/// Starts at 1. Command handlers `peek` the next id into the event they
/// emit; applying that event `observe`s it, which moves the sequence past
/// it. Smaller observed values never move it backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// The id the next new entity will get.
    pub fn peek<T: From<u64>>(&self) -> T {
        T::from(self.next)
    }

    /// Make sure future allocations stay above `raw`.
    pub fn observe(&mut self, raw: u64) {
        if raw >= self.next {
            self.next = raw + 1;
        }
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
