use std::sync::Arc;

use tabsplit_events::{EventBus, EventEnvelope, InMemoryEventBus};
use tabsplit_splitting::{
    FieldChange, ItemField, LedgerEvent, LineItemDraft, SplitSession, format_amount,
};

type Bus = Arc<InMemoryEventBus<EventEnvelope<LedgerEvent>>>;

const EPS: f64 = 1e-9;

fn groceries() -> Vec<LineItemDraft> {
    vec![
        LineItemDraft::new("Milk", 2.00, 1.0),
        LineItemDraft::new("Bread", 3.00, 2.0),
    ]
}

fn new_session() -> (SplitSession<Bus>, Bus) {
    let bus: Bus = Arc::new(InMemoryEventBus::new());
    (SplitSession::new(bus.clone()), bus)
}

#[test]
fn milk_and_bread_split_between_two_buyers() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    session.add_participant().unwrap();
    session.add_participant().unwrap();

    assert!(session.toggle_membership(0, "Buyer 1").unwrap());
    assert!(session.toggle_membership(1, "Buyer 1").unwrap());
    assert!(session.toggle_membership(1, "Buyer 2").unwrap());

    let totals = session.compute_totals();
    assert!((totals.get("Buyer 1").unwrap() - 5.0).abs() < EPS);
    assert!((totals.get("Buyer 2").unwrap() - 3.0).abs() < EPS);

    let printed: Vec<_> = totals
        .iter()
        .map(|t| format!("{}: {}", t.name, format_amount(t.amount, 2)))
        .collect();
    assert_eq!(printed, vec!["Buyer 1: 5.00", "Buyer 2: 3.00"]);

    let by_name = totals.to_map();
    assert_eq!(by_name.len(), 2);
    assert!((by_name["Buyer 1"] - 5.0).abs() < EPS);
    assert!((by_name["Buyer 2"] - 3.0).abs() < EPS);
}

#[test]
fn totals_are_empty_without_participants() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    assert!(session.compute_totals().is_empty());
}

#[test]
fn empty_seed_still_accepts_participants() {
    let (mut session, _bus) = new_session();
    session.seed(Vec::new()).unwrap();
    let name = session.add_participant().unwrap().name().to_string();

    assert_eq!(name, "Buyer 1");
    assert_eq!(session.compute_totals().get("Buyer 1"), Some(0.0));
}

#[test]
fn field_edit_returns_updated_items_and_notifies_subscribers() {
    let (mut session, bus) = new_session();
    let sub = bus.subscribe();
    session.seed(groceries()).unwrap();

    let items = session.edit_field(1, ItemField::UnitPrice, "1.").unwrap();
    assert_eq!(items[1].unit_price(), 1.0);
    assert_eq!(items[0].unit_price(), 2.0);

    let envelopes = sub.drain();
    assert_eq!(envelopes.len(), 2);
    match envelopes[1].payload() {
        LedgerEvent::ItemFieldEdited(e) => {
            assert_eq!(e.change, FieldChange::UnitPrice(1.0));
            assert!(!e.coerced);
        }
        other => panic!("Expected ItemFieldEdited, got {other:?}"),
    }
    assert!(envelopes.iter().all(|e| e.ledger_id() == session.ledger().id_typed()));
}

#[test]
fn garbage_quantity_zeroes_the_line() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    session.add_participant().unwrap();
    session.toggle_membership(1, "Buyer 1").unwrap();

    session.edit_field(1, ItemField::Quantity, "two").unwrap();

    assert_eq!(session.items()[1].quantity(), 0.0);
    assert_eq!(session.compute_totals().get("Buyer 1"), Some(0.0));
}

#[test]
fn double_toggle_restores_totals() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    session.add_participant().unwrap();
    session.toggle_membership(0, "Buyer 1").unwrap();
    let before = session.compute_totals();

    assert!(!session.toggle_membership(0, "Buyer 1").unwrap());
    assert!(session.toggle_membership(0, "Buyer 1").unwrap());

    assert_eq!(session.compute_totals(), before);
}

#[test]
fn items_added_after_participants_start_unshared() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    session.add_participant().unwrap();

    let id = session
        .add_item(LineItemDraft::new("Butter", 1.5, 2.0))
        .unwrap();

    let buyer = session.participants()[0].id_typed();
    assert_eq!(session.ledger().is_member(id, buyer), Some(false));
    assert!((session.ledger().unassigned_total() - 11.0).abs() < EPS);

    assert!(session.toggle_membership(2, "Buyer 1").unwrap());
    assert!((session.compute_totals().get("Buyer 1").unwrap() - 3.0).abs() < EPS);
}

#[test]
fn edits_are_addressed_by_position_but_linked_by_id() {
    let (mut session, _bus) = new_session();
    session.seed(groceries()).unwrap();
    session.add_participant().unwrap();
    session.toggle_membership(1, "Buyer 1").unwrap();

    // Renaming the row does not disturb who shares it.
    session.edit_field(1, ItemField::Name, "Rye").unwrap();

    let rye = session.items()[1].id_typed();
    assert_eq!(session.ledger().sharers(rye).len(), 1);
    assert!((session.compute_totals().get("Buyer 1").unwrap() - 6.0).abs() < EPS);
}
