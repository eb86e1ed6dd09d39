//! Who shares which line item.
//!
//! The relation is dense: every (item, participant) pair that exists has an
//! explicit flag. Rows are keyed by [`LineItemId`], columns by
//! [`ParticipantId`], so reordering or renaming never breaks a link.

use std::collections::BTreeMap;

use tabsplit_core::{LineItemId, ParticipantId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    rows: BTreeMap<LineItemId, BTreeMap<ParticipantId, bool>>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Add a row for `item`, unchecked for every participant in `participants`.
    pub fn add_item(&mut self, item: LineItemId, participants: impl IntoIterator<Item = ParticipantId>) {
        let row = participants.into_iter().map(|p| (p, false)).collect();
        self.rows.insert(item, row);
    }

    /// Add an unchecked column for `participant` to every existing row.
    pub fn add_participant(&mut self, participant: ParticipantId) {
        for row in self.rows.values_mut() {
            row.entry(participant).or_insert(false);
        }
    }

    /// Set the flag of one pair. Returns `false` if the pair does not exist.
    pub fn set(&mut self, item: LineItemId, participant: ParticipantId, value: bool) -> bool {
        match self
            .rows
            .get_mut(&item)
            .and_then(|row| row.get_mut(&participant))
        {
            Some(flag) => {
                *flag = value;
                true
            }
            None => false,
        }
    }

    /// Flag of one pair; `None` if the pair does not exist.
    pub fn get(&self, item: LineItemId, participant: ParticipantId) -> Option<bool> {
        self.rows.get(&item)?.get(&participant).copied()
    }

    pub fn contains_pair(&self, item: LineItemId, participant: ParticipantId) -> bool {
        self.get(item, participant).is_some()
    }

    /// Participants checked for `item`, in the order of `order`.
    pub fn sharers<'a>(
        &'a self,
        item: LineItemId,
        order: impl IntoIterator<Item = ParticipantId> + 'a,
    ) -> impl Iterator<Item = ParticipantId> + 'a {
        let row = self.rows.get(&item);
        order
            .into_iter()
            .filter(move |p| row.and_then(|r| r.get(p)).copied().unwrap_or(false))
    }

    /// Number of (item, participant) pairs tracked.
    pub fn pair_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u64) -> LineItemId {
        LineItemId::from_raw(n)
    }

    fn buyer(n: u64) -> ParticipantId {
        ParticipantId::from_raw(n)
    }

    #[test]
    fn new_participant_column_defaults_to_unchecked() {
        let mut m = Membership::new();
        m.add_item(item(1), []);
        m.add_item(item(2), []);
        m.add_participant(buyer(1));

        assert_eq!(m.get(item(1), buyer(1)), Some(false));
        assert_eq!(m.get(item(2), buyer(1)), Some(false));
        assert_eq!(m.pair_count(), 2);
    }

    #[test]
    fn new_item_row_defaults_to_unchecked() {
        let mut m = Membership::new();
        m.add_item(item(1), [buyer(1), buyer(2)]);
        assert_eq!(m.get(item(1), buyer(2)), Some(false));
        assert_eq!(m.sharers(item(1), [buyer(1), buyer(2)]).count(), 0);
    }

    #[test]
    fn set_touches_exactly_one_pair() {
        let mut m = Membership::new();
        m.add_item(item(1), [buyer(1), buyer(2)]);
        m.add_item(item(2), [buyer(1), buyer(2)]);

        assert!(m.set(item(1), buyer(2), true));

        assert_eq!(m.get(item(1), buyer(2)), Some(true));
        assert_eq!(m.get(item(1), buyer(1)), Some(false));
        assert_eq!(m.get(item(2), buyer(2)), Some(false));
    }

    #[test]
    fn unknown_pairs_are_reported() {
        let mut m = Membership::new();
        m.add_item(item(1), [buyer(1)]);
        assert!(!m.set(item(1), buyer(9), true));
        assert!(!m.set(item(9), buyer(1), true));
        assert!(!m.contains_pair(item(9), buyer(1)));
    }

    #[test]
    fn sharers_follow_given_order() {
        let mut m = Membership::new();
        m.add_item(item(1), [buyer(1), buyer(2), buyer(3)]);
        m.set(item(1), buyer(3), true);
        m.set(item(1), buyer(1), true);

        let got: Vec<_> = m.sharers(item(1), [buyer(3), buyer(2), buyer(1)]).collect();
        assert_eq!(got, vec![buyer(3), buyer(1)]);
    }
}
