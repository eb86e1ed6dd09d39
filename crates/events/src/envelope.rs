use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabsplit_core::LedgerId;

/// Envelope for an event, carrying stream metadata.
///
/// - `sequence_number` is the ledger version right after the event was
///   applied, so it is monotonically increasing per ledger.
/// - `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    ledger_id: LedgerId,
    sequence_number: u64,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, ledger_id: LedgerId, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id,
            ledger_id,
            sequence_number,
            payload,
        }
    }

    /// Wrap `payload` with a fresh UUIDv7 event id.
    pub fn wrap(ledger_id: LedgerId, sequence_number: u64, payload: E) -> Self {
        Self::new(Uuid::now_v7(), ledger_id, sequence_number, payload)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn ledger_id(&self) -> LedgerId {
        self.ledger_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}
