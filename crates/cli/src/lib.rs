//! `tabsplit-cli`
//!
//! Terminal front end for splitting a receipt: loads an extraction payload,
//! seeds a ledger, then reads editing commands line by line.

pub mod command;
pub mod config;
pub mod render;
pub mod repl;

pub use command::{CommandError, SessionCommand};
pub use config::CliConfig;
pub use repl::{Flow, Repl};
