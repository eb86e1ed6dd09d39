use serde::{Deserialize, Serialize};

use tabsplit_core::ParticipantId;

/// Someone sharing the bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Default display name for the `ordinal`-th participant (1-based).
    pub fn default_name(ordinal: usize) -> String {
        format!("Buyer {ordinal}")
    }

    pub fn id_typed(&self) -> ParticipantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
