//! `tabsplit-core`: ids, errors and the aggregate contract shared by every crate.
//!
//! This crate contains **pure domain** primitives (no IO, no presentation).

pub mod aggregate;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::{IdSequence, LedgerId, LineItemId, ParticipantId};
