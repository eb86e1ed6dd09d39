//! Receipt input contract.
//!
//! The extraction service returns `{ date, store, products, taxes, total }`.
//! This crate turns that payload into ledger seed items, keeps the
//! pass-through display fields, and abstracts where the payload comes from.

pub mod data;
pub mod error;
pub mod source;
pub mod summary;

pub use data::{ReceiptData, ReceiptProduct};
pub use error::ReceiptError;
pub use source::{JsonFileSource, JsonReaderSource, ReceiptSource, StaticSource};
pub use summary::ReceiptSummary;
