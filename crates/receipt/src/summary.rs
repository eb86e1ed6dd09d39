use serde::Serialize;

use tabsplit_splitting::SplitLedger;

use crate::data::ReceiptData;

/// Footer shown under the editable table.
///
/// `taxes` and `total` are the extraction service's figures, shown as-is:
/// they are authoritative and are not recomputed when items are edited.
/// `items_subtotal` is computed from the ledger's current items so the user
/// can see when the two drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptSummary {
    pub store: Option<String>,
    pub date: Option<String>,
    pub taxes: f64,
    pub total: f64,
    pub items_subtotal: f64,
    pub unassigned: f64,
}

impl ReceiptSummary {
    pub fn new(receipt: &ReceiptData, ledger: &SplitLedger) -> Self {
        Self {
            store: receipt.store.clone(),
            date: receipt.date.clone(),
            taxes: receipt.taxes,
            total: receipt.total,
            items_subtotal: ledger.items_subtotal(),
            unassigned: ledger.unassigned_total(),
        }
    }

    /// `total - (items_subtotal + taxes)`; zero when the edited items still
    /// match the printed receipt.
    pub fn discrepancy(&self) -> f64 {
        self.total - (self.items_subtotal + self.taxes)
    }
}
