//! Editing session over one ledger.
//!
//! The session is the surface an interactive front end talks to: items are
//! addressed by their display position and participants by their display
//! name, exactly as they appear on screen. It resolves those to stable ids,
//! runs the command through the ledger and publishes the applied events.

use chrono::Utc;

use tabsplit_core::{AggregateRoot, DomainError, DomainResult, LedgerId, LineItemId, ParticipantId};
use tabsplit_events::{Event, EventBus, EventEnvelope, execute};

use crate::item::{ItemField, LineItem, LineItemDraft};
use crate::ledger::{
    AddLineItem, AddParticipant, EditItemField, ItemFieldEdited, LedgerCommand, LedgerEvent,
    SeedLedger, SplitLedger, ToggleMembership,
};
use crate::participant::Participant;
use crate::totals::SplitTotals;

pub struct SplitSession<B> {
    ledger: SplitLedger,
    bus: B,
}

impl<B> SplitSession<B>
where
    B: EventBus<EventEnvelope<LedgerEvent>>,
{
    pub fn new(bus: B) -> Self {
        Self::with_ledger_id(LedgerId::new(), bus)
    }

    pub fn with_ledger_id(ledger_id: LedgerId, bus: B) -> Self {
        Self {
            ledger: SplitLedger::empty(ledger_id),
            bus,
        }
    }

    pub fn ledger(&self) -> &SplitLedger {
        &self.ledger
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn items(&self) -> &[LineItem] {
        self.ledger.items()
    }

    pub fn participants(&self) -> &[Participant] {
        self.ledger.participants()
    }

    /// Replace everything with `items` (possibly empty).
    pub fn seed(&mut self, items: Vec<LineItemDraft>) -> DomainResult<()> {
        let count = items.len();
        self.dispatch(LedgerCommand::SeedLedger(SeedLedger {
            ledger_id: self.ledger.id_typed(),
            items,
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(ledger_id = %self.ledger.id_typed(), items = count, "ledger seeded");
        Ok(())
    }

    /// Apply user text to one field of the item at `index`.
    ///
    /// Numeric fields never reject input (see [`crate::amount`]). Returns the
    /// updated item sequence for the caller to mirror.
    pub fn edit_field(
        &mut self,
        index: usize,
        field: ItemField,
        raw_value: &str,
    ) -> DomainResult<&[LineItem]> {
        let item_id = self.item_id_at(index)?;
        self.dispatch(LedgerCommand::EditItemField(EditItemField {
            ledger_id: self.ledger.id_typed(),
            item_id,
            field,
            raw_value: raw_value.to_string(),
            occurred_at: Utc::now(),
        }))?;
        Ok(self.ledger.items())
    }

    /// Append an item nobody shares yet.
    pub fn add_item(&mut self, draft: LineItemDraft) -> DomainResult<LineItemId> {
        let events = self.dispatch(LedgerCommand::AddLineItem(AddLineItem {
            ledger_id: self.ledger.id_typed(),
            item: draft,
            occurred_at: Utc::now(),
        }))?;
        events
            .iter()
            .find_map(|e| match e {
                LedgerEvent::LineItemAdded(added) => Some(added.item.id_typed()),
                _ => None,
            })
            .ok_or_else(|| DomainError::invariant("add item produced no LineItemAdded event"))
    }

    /// Append the next "Buyer N".
    pub fn add_participant(&mut self) -> DomainResult<&Participant> {
        let events = self.dispatch(LedgerCommand::AddParticipant(AddParticipant {
            ledger_id: self.ledger.id_typed(),
            occurred_at: Utc::now(),
        }))?;
        let id = events
            .iter()
            .find_map(|e| match e {
                LedgerEvent::ParticipantAdded(added) => Some(added.participant.id_typed()),
                _ => None,
            })
            .ok_or_else(|| DomainError::invariant("add participant produced no event"))?;
        self.ledger
            .participant(id)
            .ok_or_else(|| DomainError::invariant(format!("participant {id} vanished")))
    }

    /// Flip whether `participant_name` shares the item at `index`.
    ///
    /// Returns the new flag value.
    pub fn toggle_membership(&mut self, index: usize, participant_name: &str) -> DomainResult<bool> {
        let item_id = self.item_id_at(index)?;
        let participant_id = self.participant_id_named(participant_name)?;
        self.dispatch(LedgerCommand::ToggleMembership(ToggleMembership {
            ledger_id: self.ledger.id_typed(),
            item_id,
            participant_id,
            occurred_at: Utc::now(),
        }))?;
        self.ledger
            .is_member(item_id, participant_id)
            .ok_or_else(|| DomainError::invariant("membership missing after toggle"))
    }

    /// Current per-participant totals. Pure; call after every mutation.
    pub fn compute_totals(&self) -> SplitTotals {
        self.ledger.compute_totals()
    }

    /// Run a command against the ledger and publish what it applied.
    ///
    /// A rejected command leaves the ledger untouched and publishes nothing.
    pub fn dispatch(&mut self, command: LedgerCommand) -> DomainResult<Vec<LedgerEvent>> {
        let base_version = self.ledger.version();
        let events = execute(&mut self.ledger, &command)?;

        for (offset, event) in events.iter().enumerate() {
            log_applied(event);
            let envelope = EventEnvelope::wrap(
                self.ledger.id_typed(),
                base_version + offset as u64 + 1,
                event.clone(),
            );
            if let Err(err) = self.bus.publish(envelope) {
                tracing::warn!(
                    event_type = event.event_type(),
                    error = ?err,
                    "failed to publish ledger event"
                );
            }
        }

        Ok(events)
    }

    /// Precondition: `index` addresses a displayed item.
    fn item_id_at(&self, index: usize) -> DomainResult<LineItemId> {
        self.ledger.item_id_at(index).ok_or_else(|| {
            DomainError::invariant(format!(
                "item index {index} out of range (have {})",
                self.ledger.items().len()
            ))
        })
    }

    fn participant_id_named(&self, name: &str) -> DomainResult<ParticipantId> {
        self.ledger
            .participant_named(name)
            .map(Participant::id_typed)
            .ok_or_else(|| DomainError::not_found(format!("participant `{name}`")))
    }
}

fn log_applied(event: &LedgerEvent) {
    if let LedgerEvent::ItemFieldEdited(e @ ItemFieldEdited { coerced: true, .. }) = event {
        tracing::warn!(item_id = %e.item_id, field = %e.change.field(), "numeric input coerced");
    }
    tracing::debug!(event_type = event.event_type(), "ledger event applied");
}
