//! Line-oriented editing loop.

use std::io::{BufRead, Write};

use anyhow::Context;

use tabsplit_core::DomainResult;
use tabsplit_events::{EventBus, EventEnvelope, Subscription};
use tabsplit_receipt::{ReceiptData, ReceiptSummary};
use tabsplit_splitting::{
    FieldChange, LedgerEvent, LineItemDraft, SplitSession, format_amount, parse_amount,
};

use crate::command::{HELP, SessionCommand};
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<B, W> {
    session: SplitSession<B>,
    changes: Subscription<EventEnvelope<LedgerEvent>>,
    receipt: ReceiptData,
    decimals: usize,
    out: W,
}

impl<B, W> Repl<B, W>
where
    B: EventBus<EventEnvelope<LedgerEvent>>,
    W: Write,
{
    /// Seed a fresh ledger from `receipt`.
    ///
    /// The loop subscribes to the session's bus first; every redraw is
    /// driven by the ledger events it receives.
    pub fn new(
        mut session: SplitSession<B>,
        receipt: ReceiptData,
        decimals: usize,
        out: W,
    ) -> DomainResult<Self> {
        let changes = session.bus().subscribe();
        session.seed(receipt.line_item_drafts())?;
        Ok(Self {
            session,
            changes,
            receipt,
            decimals,
            out,
        })
    }

    pub fn session(&self) -> &SplitSession<B> {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        self.take_changes()?;
        render::table(&mut self.out, self.session.ledger(), self.decimals)?;
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            if line.trim().is_empty() {
                continue;
            }
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Parse and execute one line. Bad commands and rejected edits are
    /// reported to the user; only output failures are returned as errors.
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        self.execute(command)
    }

    pub fn execute(&mut self, command: SessionCommand) -> anyhow::Result<Flow> {
        let outcome = match command {
            SessionCommand::Show => {
                render::table(&mut self.out, self.session.ledger(), self.decimals)?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Totals => {
                self.print_totals()?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Summary => {
                let summary = ReceiptSummary::new(&self.receipt, self.session.ledger());
                render::summary(&mut self.out, &summary, self.decimals)?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::AddBuyer => self
                .session
                .add_participant()
                .map(|p| format!("added {}", p.name())),
            SessionCommand::AddItem {
                name,
                price,
                quantity,
            } => self
                .session
                .add_item(LineItemDraft::new(
                    name,
                    parse_amount(&price),
                    parse_amount(&quantity),
                ))
                .map(|_| format!("added row {}", self.session.items().len())),
            SessionCommand::Edit {
                index,
                field,
                value,
            } => self
                .session
                .edit_field(index, field, &value)
                .map(|_| format!("row {} {field} updated", index + 1)),
            SessionCommand::Toggle { index, buyer } => self
                .session
                .toggle_membership(index, &buyer)
                .map(|on| {
                    let verb = if on { "now shares" } else { "no longer shares" };
                    format!("{buyer} {verb} row {}", index + 1)
                }),
        };

        match outcome {
            Ok(message) => {
                writeln!(self.out, "{message}")?;
                if self.take_changes()? > 0 {
                    render::table(&mut self.out, self.session.ledger(), self.decimals)?;
                    self.print_totals()?;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "command rejected");
                writeln!(self.out, "error: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Drain pending ledger events, noting coerced numeric input.
    fn take_changes(&mut self) -> std::io::Result<usize> {
        let envelopes = self.changes.drain();
        for envelope in &envelopes {
            tracing::debug!(
                event_id = %envelope.event_id(),
                sequence = envelope.sequence_number(),
                "ledger changed"
            );
            if let LedgerEvent::ItemFieldEdited(edit) = envelope.payload() {
                if !edit.coerced {
                    continue;
                }
                let value = match &edit.change {
                    FieldChange::UnitPrice(v) | FieldChange::Quantity(v) => *v,
                    FieldChange::Name(_) => continue,
                };
                writeln!(
                    self.out,
                    "note: {} is not a clean number; stored {}",
                    edit.change.field(),
                    format_amount(value, self.decimals)
                )?;
            }
        }
        Ok(envelopes.len())
    }

    fn print_totals(&mut self) -> std::io::Result<()> {
        let totals = self.session.compute_totals();
        render::totals(&mut self.out, &totals, self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsplit_events::InMemoryEventBus;
    use tabsplit_receipt::ReceiptProduct;

    type TestRepl = Repl<InMemoryEventBus<EventEnvelope<LedgerEvent>>, Vec<u8>>;

    fn receipt() -> ReceiptData {
        ReceiptData {
            store: Some("Corner Shop".to_string()),
            products: vec![
                ReceiptProduct {
                    name: "Milk".to_string(),
                    price: 2.0,
                    quantity: 1.0,
                },
                ReceiptProduct {
                    name: "Bread".to_string(),
                    price: 3.0,
                    quantity: 2.0,
                },
            ],
            taxes: 0.5,
            total: 8.5,
            ..ReceiptData::default()
        }
    }

    fn repl() -> TestRepl {
        Repl::new(SplitSession::new(InMemoryEventBus::new()), receipt(), 2, Vec::new()).unwrap()
    }

    fn output(repl: TestRepl) -> String {
        String::from_utf8(repl.into_output()).unwrap()
    }

    #[test]
    fn scripted_session_prints_buyer_totals() {
        let mut repl = repl();
        let script = "buyer\nbuyer\ntoggle 1 Buyer 1\ntoggle 2 Buyer 1\ntoggle 2 Buyer 2\ntotals\nquit\nbuyer\n";
        repl.run(script.as_bytes()).unwrap();

        assert_eq!(repl.session().participants().len(), 2);
        let out = output(repl);
        assert!(out.contains("Buyer 1: 5.00"));
        assert!(out.contains("Buyer 2: 3.00"));
    }

    #[test]
    fn bad_rows_are_reported_and_the_loop_continues() {
        let mut repl = repl();
        assert_eq!(repl.handle_line("edit 9 price 1").unwrap(), Flow::Continue);
        assert_eq!(repl.handle_line("toggle 1 Nobody").unwrap(), Flow::Continue);
        assert_eq!(repl.handle_line("frobnicate").unwrap(), Flow::Continue);

        let out = output(repl);
        assert!(out.contains("error: invariant violated: item index 8 out of range"));
        assert!(out.contains("error: not found: participant `Nobody`"));
        assert!(out.contains("error: unknown command `frobnicate`"));
    }

    #[test]
    fn summary_shows_receipt_figures_verbatim() {
        let mut repl = repl();
        repl.handle_line("edit 2 quantity 3").unwrap();
        repl.handle_line("summary").unwrap();

        let out = output(repl);
        assert!(out.contains("Store: Corner Shop"));
        assert!(out.contains("Tax: 0.50"));
        assert!(out.contains("Total: 8.50"));
        assert!(out.contains("Items subtotal: 11.00"));
    }

    #[test]
    fn coerced_input_is_noted_from_the_event_stream() {
        let mut repl = repl();
        repl.handle_line("edit 1 price abc").unwrap();
        repl.handle_line("edit 2 quantity 3").unwrap();

        assert_eq!(repl.session().items()[0].unit_price(), 0.0);
        let out = output(repl);
        assert_eq!(out.matches("note:").count(), 1);
        assert!(out.contains("note: unit_price is not a clean number; stored 0.00"));
    }

    #[test]
    fn every_mutation_is_received_and_redrawn() {
        let mut repl = repl();
        repl.handle_line("buyer").unwrap();
        repl.handle_line("toggle 1 Buyer 1").unwrap();
        repl.handle_line("toggle 1 Nobody").unwrap();

        assert_eq!(repl.session().bus().delivered_count(), 3);
        assert!(repl.changes.drain().is_empty());
        let out = output(repl);
        assert_eq!(out.matches("Buyer totals:").count(), 2);
    }

    #[test]
    fn added_items_can_be_shared() {
        let mut repl = repl();
        repl.handle_line("buyer").unwrap();
        repl.handle_line("item Olive oil 7.99 1").unwrap();
        repl.handle_line("toggle 3 Buyer 1").unwrap();

        assert_eq!(repl.session().items()[2].name(), "Olive oil");
        assert!(output(repl).contains("Buyer 1: 7.99"));
    }
}
