//! Plain-text rendering of the ledger. Rounding happens only here.

use std::io::{self, Write};

use tabsplit_receipt::ReceiptSummary;
use tabsplit_splitting::{SplitLedger, SplitTotals, format_amount};

const NAME_WIDTH: usize = 20;
const NUM_WIDTH: usize = 10;

pub fn table(out: &mut impl Write, ledger: &SplitLedger, decimals: usize) -> io::Result<()> {
    if ledger.items().is_empty() {
        return writeln!(out, "(no items)");
    }

    write!(
        out,
        "{:>3}  {:<NAME_WIDTH$} {:>NUM_WIDTH$} {:>NUM_WIDTH$}",
        "#", "Name", "Price", "Qty"
    )?;
    for p in ledger.participants() {
        write!(out, "  {}", p.name())?;
    }
    writeln!(out)?;

    for (row, item) in ledger.items().iter().enumerate() {
        write!(
            out,
            "{:>3}  {:<NAME_WIDTH$} {:>NUM_WIDTH$} {:>NUM_WIDTH$}",
            row + 1,
            truncate(item.name(), NAME_WIDTH),
            format_amount(item.unit_price(), decimals),
            item.quantity(),
        )?;
        for p in ledger.participants() {
            let mark = match ledger.is_member(item.id_typed(), p.id_typed()) {
                Some(true) => "[x]",
                _ => "[ ]",
            };
            // Centre the mark under the buyer's header.
            write!(out, "  {mark:^width$}", width = p.name().chars().count())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn totals(out: &mut impl Write, totals: &SplitTotals, decimals: usize) -> io::Result<()> {
    if totals.is_empty() {
        return writeln!(out, "(no buyers yet; add one with `buyer`)");
    }
    writeln!(out, "Buyer totals:")?;
    for entry in totals {
        writeln!(out, "  {}: {}", entry.name, format_amount(entry.amount, decimals))?;
    }
    Ok(())
}

pub fn summary(out: &mut impl Write, summary: &ReceiptSummary, decimals: usize) -> io::Result<()> {
    if let Some(store) = &summary.store {
        writeln!(out, "Store: {store}")?;
    }
    if let Some(date) = &summary.date {
        writeln!(out, "Date: {date}")?;
    }
    writeln!(out, "Tax: {}", format_amount(summary.taxes, decimals))?;
    writeln!(out, "Total: {}", format_amount(summary.total, decimals))?;
    writeln!(
        out,
        "Items subtotal: {}",
        format_amount(summary.items_subtotal, decimals)
    )?;
    if summary.unassigned > 0.0 {
        writeln!(
            out,
            "Unassigned: {}",
            format_amount(summary.unassigned, decimals)
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_truncated_to_width() {
        assert_eq!(truncate("Milk", 20), "Milk");
        let cut = truncate("Extra virgin olive oil 750ml", 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('~'));
    }

    #[test]
    fn empty_totals_hint_at_adding_buyers() {
        let mut out = Vec::new();
        totals(&mut out, &SplitTotals::default(), 2).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no buyers"));
    }
}
