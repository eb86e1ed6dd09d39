use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tabsplit_core::ParticipantId;

/// What one participant owes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTotal {
    pub participant_id: ParticipantId,
    pub name: String,
    pub amount: f64,
}

/// Per-participant totals, in participant order.
///
/// Every current participant has an entry, including those owing `0`.
/// Amounts are unrounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitTotals {
    entries: Vec<ParticipantTotal>,
}

impl SplitTotals {
    pub(crate) fn new(entries: Vec<ParticipantTotal>) -> Self {
        Self { entries }
    }

    /// Amount owed by the participant with this display name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.amount)
    }

    pub fn get_by_id(&self, id: ParticipantId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.participant_id == id)
            .map(|e| e.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all participants (what has been settled).
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Name → amount mapping.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.amount))
            .collect()
    }
}

impl<'a> IntoIterator for &'a SplitTotals {
    type Item = &'a ParticipantTotal;
    type IntoIter = core::slice::Iter<'a, ParticipantTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
