use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tabsplit_core::{
    Aggregate, AggregateRoot, DomainError, IdSequence, LedgerId, LineItemId, ParticipantId,
};
use tabsplit_events::Event;

use crate::item::{FieldChange, ItemField, LineItem, LineItemDraft};
use crate::membership::Membership;
use crate::participant::Participant;
use crate::totals::{ParticipantTotal, SplitTotals};

/// Aggregate root: SplitLedger.
///
/// Owns the ordered line items, the append-only participant list and the
/// dense membership relation between them. Totals are derived on demand by
/// [`SplitLedger::compute_totals`] and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLedger {
    id: LedgerId,
    items: Vec<LineItem>,
    participants: Vec<Participant>,
    membership: Membership,
    item_ids: IdSequence,
    participant_ids: IdSequence,
    version: u64,
}

impl SplitLedger {
    /// Create an empty ledger (no items, no participants).
    pub fn empty(id: LedgerId) -> Self {
        Self {
            id,
            items: Vec::new(),
            participants: Vec::new(),
            membership: Membership::new(),
            item_ids: IdSequence::new(),
            participant_ids: IdSequence::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id_typed() == id)
    }

    /// Id of the item currently displayed at `index`.
    pub fn item_id_at(&self, index: usize) -> Option<LineItemId> {
        self.items.get(index).map(LineItem::id_typed)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id_typed() == id)
    }

    pub fn participant_named(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name() == name)
    }

    /// Whether `participant` shares `item`; `None` if either does not exist.
    pub fn is_member(&self, item: LineItemId, participant: ParticipantId) -> Option<bool> {
        self.membership.get(item, participant)
    }

    /// Participants sharing `item`, in participant order.
    pub fn sharers(&self, item: LineItemId) -> Vec<ParticipantId> {
        self.membership
            .sharers(item, self.participant_order())
            .collect()
    }

    /// Sum of all line totals, regardless of who shares them.
    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of line totals nobody is marked as sharing.
    ///
    /// These items are left out of settlement entirely.
    pub fn unassigned_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| {
                self.membership
                    .sharers(item.id_typed(), self.participant_order())
                    .next()
                    .is_none()
            })
            .map(LineItem::line_total)
            .sum()
    }

    /// Even split of one item among its sharers.
    ///
    /// Empty when nobody shares the item.
    pub fn item_shares(&self, item: &LineItem) -> Vec<(ParticipantId, f64)> {
        let sharers = self.sharers(item.id_typed());
        if sharers.is_empty() {
            return Vec::new();
        }
        let per_sharer = item.line_total() / sharers.len() as f64;
        sharers.into_iter().map(|p| (p, per_sharer)).collect()
    }

    /// Amount owed by every participant.
    ///
    /// Each item's cost is divided evenly among the participants sharing it;
    /// items without sharers contribute nothing. No rounding is applied.
    pub fn compute_totals(&self) -> SplitTotals {
        let mut amounts = vec![0.0_f64; self.participants.len()];

        for item in &self.items {
            for (participant, share) in self.item_shares(item) {
                if let Some(slot) = self
                    .participants
                    .iter()
                    .position(|p| p.id_typed() == participant)
                {
                    amounts[slot] += share;
                }
            }
        }

        let entries = self
            .participants
            .iter()
            .zip(amounts)
            .map(|(p, amount)| ParticipantTotal {
                participant_id: p.id_typed(),
                name: p.name().to_string(),
                amount,
            })
            .collect();

        SplitTotals::new(entries)
    }

    fn participant_order(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participants.iter().map(Participant::id_typed)
    }
}

impl AggregateRoot for SplitLedger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SeedLedger.
///
/// Replaces items, participants and membership with a fresh set of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedLedger {
    pub ledger_id: LedgerId,
    pub items: Vec<LineItemDraft>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditItemField.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditItemField {
    pub ledger_id: LedgerId,
    pub item_id: LineItemId,
    pub field: ItemField,
    /// Text exactly as typed by the user.
    pub raw_value: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddLineItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddLineItem {
    pub ledger_id: LedgerId,
    pub item: LineItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddParticipant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub ledger_id: LedgerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ToggleMembership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleMembership {
    pub ledger_id: LedgerId,
    pub item_id: LineItemId,
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    SeedLedger(SeedLedger),
    EditItemField(EditItemField),
    AddLineItem(AddLineItem),
    AddParticipant(AddParticipant),
    ToggleMembership(ToggleMembership),
}

/// Event: LedgerSeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSeeded {
    pub ledger_id: LedgerId,
    pub items: Vec<LineItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemFieldEdited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFieldEdited {
    pub ledger_id: LedgerId,
    pub item_id: LineItemId,
    pub change: FieldChange,
    /// The typed text was not a clean number and was truncated or zeroed.
    pub coerced: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineItemAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemAdded {
    pub ledger_id: LedgerId,
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub ledger_id: LedgerId,
    pub participant: Participant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MembershipToggled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipToggled {
    pub ledger_id: LedgerId,
    pub item_id: LineItemId,
    pub participant_id: ParticipantId,
    /// Flag value after the toggle.
    pub is_member: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    LedgerSeeded(LedgerSeeded),
    ItemFieldEdited(ItemFieldEdited),
    LineItemAdded(LineItemAdded),
    ParticipantAdded(ParticipantAdded),
    MembershipToggled(MembershipToggled),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::LedgerSeeded(_) => "ledger.seeded",
            LedgerEvent::ItemFieldEdited(_) => "ledger.item_field_edited",
            LedgerEvent::LineItemAdded(_) => "ledger.item_added",
            LedgerEvent::ParticipantAdded(_) => "ledger.participant_added",
            LedgerEvent::MembershipToggled(_) => "ledger.membership_toggled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::LedgerSeeded(e) => e.occurred_at,
            LedgerEvent::ItemFieldEdited(e) => e.occurred_at,
            LedgerEvent::LineItemAdded(e) => e.occurred_at,
            LedgerEvent::ParticipantAdded(e) => e.occurred_at,
            LedgerEvent::MembershipToggled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for SplitLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::LedgerSeeded(e) => {
                self.items = e.items.clone();
                self.participants.clear();
                self.membership.clear();
                for item in &self.items {
                    self.item_ids.observe(item.id_typed().raw());
                    self.membership.add_item(item.id_typed(), []);
                }
            }
            LedgerEvent::ItemFieldEdited(e) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id_typed() == e.item_id) {
                    item.apply_change(&e.change);
                }
            }
            LedgerEvent::LineItemAdded(e) => {
                let id = e.item.id_typed();
                self.item_ids.observe(id.raw());
                self.membership.add_item(
                    id,
                    self.participants.iter().map(Participant::id_typed),
                );
                self.items.push(e.item.clone());
            }
            LedgerEvent::ParticipantAdded(e) => {
                let id = e.participant.id_typed();
                self.participant_ids.observe(id.raw());
                self.membership.add_participant(id);
                self.participants.push(e.participant.clone());
            }
            LedgerEvent::MembershipToggled(e) => {
                self.membership.set(e.item_id, e.participant_id, e.is_member);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::SeedLedger(cmd) => self.handle_seed(cmd),
            LedgerCommand::EditItemField(cmd) => self.handle_edit_field(cmd),
            LedgerCommand::AddLineItem(cmd) => self.handle_add_item(cmd),
            LedgerCommand::AddParticipant(cmd) => self.handle_add_participant(cmd),
            LedgerCommand::ToggleMembership(cmd) => self.handle_toggle(cmd),
        }
    }
}

impl SplitLedger {
    fn ensure_ledger_id(&self, ledger_id: LedgerId) -> Result<(), DomainError> {
        if self.id != ledger_id {
            return Err(DomainError::invariant("ledger_id mismatch"));
        }
        Ok(())
    }

    fn ensure_item(&self, item_id: LineItemId) -> Result<(), DomainError> {
        if self.item(item_id).is_none() {
            return Err(DomainError::not_found(format!("line item {item_id}")));
        }
        Ok(())
    }

    fn ensure_participant(&self, participant_id: ParticipantId) -> Result<(), DomainError> {
        if self.participant(participant_id).is_none() {
            return Err(DomainError::not_found(format!("participant {participant_id}")));
        }
        Ok(())
    }

    fn handle_seed(&self, cmd: &SeedLedger) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_ledger_id(cmd.ledger_id)?;

        let first = self.item_ids.peek::<LineItemId>().raw();
        let items = cmd
            .items
            .iter()
            .cloned()
            .zip(first..)
            .map(|(draft, raw)| draft.into_item(LineItemId::from_raw(raw)))
            .collect();

        Ok(vec![LedgerEvent::LedgerSeeded(LedgerSeeded {
            ledger_id: cmd.ledger_id,
            items,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit_field(&self, cmd: &EditItemField) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_ledger_id(cmd.ledger_id)?;
        self.ensure_item(cmd.item_id)?;

        let (change, coerced) = cmd.field.interpret(&cmd.raw_value);

        Ok(vec![LedgerEvent::ItemFieldEdited(ItemFieldEdited {
            ledger_id: cmd.ledger_id,
            item_id: cmd.item_id,
            change,
            coerced,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_item(&self, cmd: &AddLineItem) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_ledger_id(cmd.ledger_id)?;

        let id = self.item_ids.peek::<LineItemId>();

        Ok(vec![LedgerEvent::LineItemAdded(LineItemAdded {
            ledger_id: cmd.ledger_id,
            item: cmd.item.clone().into_item(id),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_participant(
        &self,
        cmd: &AddParticipant,
    ) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_ledger_id(cmd.ledger_id)?;

        let participant = Participant::new(
            self.participant_ids.peek(),
            Participant::default_name(self.participants.len() + 1),
        );

        Ok(vec![LedgerEvent::ParticipantAdded(ParticipantAdded {
            ledger_id: cmd.ledger_id,
            participant,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_toggle(&self, cmd: &ToggleMembership) -> Result<Vec<LedgerEvent>, DomainError> {
        self.ensure_ledger_id(cmd.ledger_id)?;
        self.ensure_item(cmd.item_id)?;
        self.ensure_participant(cmd.participant_id)?;

        let current = self
            .membership
            .get(cmd.item_id, cmd.participant_id)
            .ok_or_else(|| {
                DomainError::invariant(format!(
                    "missing membership for ({}, {})",
                    cmd.item_id, cmd.participant_id
                ))
            })?;

        Ok(vec![LedgerEvent::MembershipToggled(MembershipToggled {
            ledger_id: cmd.ledger_id,
            item_id: cmd.item_id,
            participant_id: cmd.participant_id,
            is_member: !current,
            occurred_at: cmd.occurred_at,
        })])
    }
}
