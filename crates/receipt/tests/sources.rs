use std::io::Cursor;

use tabsplit_events::{EventEnvelope, InMemoryEventBus};
use tabsplit_receipt::{
    JsonFileSource, JsonReaderSource, ReceiptData, ReceiptError, ReceiptSource, ReceiptSummary,
    StaticSource,
};
use tabsplit_splitting::{ItemField, LedgerEvent, SplitSession};

const PAYLOAD: &str = r#"{
    "date": "2024-11-02",
    "store": "Corner Shop",
    "products": [
        {"name": "Milk", "price": 2.0, "quantity": 1},
        {"name": "Bread", "price": 3.0, "quantity": 2}
    ],
    "taxes": 0.5,
    "total": 8.5
}"#;

fn seeded_session(data: &ReceiptData) -> SplitSession<InMemoryEventBus<EventEnvelope<LedgerEvent>>> {
    let mut session = SplitSession::new(InMemoryEventBus::new());
    session.seed(data.line_item_drafts()).unwrap();
    session
}

#[test]
fn reader_source_seeds_a_ledger() {
    let mut source = JsonReaderSource::new(Cursor::new(PAYLOAD));
    let data = source.fetch().unwrap();
    let session = seeded_session(&data);

    let names: Vec<_> = session.items().iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["Milk", "Bread"]);

    let err = source.fetch().unwrap_err();
    assert!(matches!(err, ReceiptError::Unavailable(_)));
}

#[test]
fn file_source_reads_saved_payload() {
    let path = std::env::temp_dir().join(format!("tabsplit-receipt-{}.json", std::process::id()));
    std::fs::write(&path, PAYLOAD).unwrap();

    let data = JsonFileSource::new(&path).fetch().unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(data.store.as_deref(), Some("Corner Shop"));
    assert_eq!(data.products.len(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = JsonFileSource::new("/definitely/not/here.json")
        .fetch()
        .unwrap_err();
    assert!(matches!(err, ReceiptError::Io { .. }));
}

#[test]
fn malformed_payload_is_a_parse_error() {
    let err = JsonReaderSource::new(Cursor::new("{ nope"))
        .fetch()
        .unwrap_err();
    assert!(matches!(err, ReceiptError::Parse(_)));
}

#[test]
fn empty_static_source_seeds_an_empty_ledger() {
    let data = StaticSource::default().fetch().unwrap();
    let session = seeded_session(&data);
    assert!(session.items().is_empty());
}

#[test]
fn summary_keeps_authoritative_figures_after_edits() {
    let data = ReceiptData::from_json_str(PAYLOAD).unwrap();
    let mut session = seeded_session(&data);

    let summary = ReceiptSummary::new(&data, session.ledger());
    assert_eq!(summary.items_subtotal, 8.0);
    assert!(summary.discrepancy().abs() < 1e-9);

    session.edit_field(1, ItemField::Quantity, "3").unwrap();

    let summary = ReceiptSummary::new(&data, session.ledger());
    assert_eq!(summary.total, 8.5);
    assert_eq!(summary.taxes, 0.5);
    assert_eq!(summary.items_subtotal, 11.0);
    assert!((summary.discrepancy() + 3.0).abs() < 1e-9);
    assert_eq!(summary.unassigned, 11.0);
}
