//! Bill splitting domain module.
//!
//! A [`SplitLedger`] holds the line items of one receipt, the people sharing
//! it, and who shares which item. Totals per person are derived on demand.
//! The crate is deterministic domain logic (no IO); [`SplitSession`] adds the
//! positional editing surface and publishes applied events on a bus.

pub mod amount;
pub mod item;
pub mod ledger;
pub mod membership;
pub mod participant;
pub mod session;
pub mod totals;

pub use amount::{LenientAmount, format_amount, parse_amount};
pub use item::{FieldChange, ItemField, LineItem, LineItemDraft};
pub use ledger::{
    AddLineItem, AddParticipant, EditItemField, ItemFieldEdited, LedgerCommand, LedgerEvent,
    LedgerSeeded, LineItemAdded, MembershipToggled, ParticipantAdded, SeedLedger, SplitLedger,
    ToggleMembership,
};
pub use membership::Membership;
pub use participant::Participant;
pub use session::SplitSession;
pub use totals::{ParticipantTotal, SplitTotals};
