//! Editing commands typed at the prompt.
//!
//! Rows are 1-based on screen and converted to 0-based item positions here.

use core::str::FromStr;

use thiserror::Error;

use tabsplit_splitting::ItemField;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Print the table.
    Show,
    /// Add the next "Buyer N".
    AddBuyer,
    /// Append a line item: `item <name...> <price> <quantity>`.
    AddItem {
        name: String,
        price: String,
        quantity: String,
    },
    /// `edit <row> <field> <value...>`; the value may be empty.
    Edit {
        index: usize,
        field: ItemField,
        value: String,
    },
    /// `toggle <row> <buyer name...>`.
    Toggle { index: usize, buyer: String },
    Totals,
    Summary,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("row must be a number starting at 1, got `{0}`")]
    BadRow(String),
    #[error("unknown field `{0}` (name, price, quantity)")]
    BadField(String),
}

pub const HELP: &str = "\
commands:
  show                          print items, buyers and shares
  buyer                         add the next buyer column
  item <name> <price> <qty>     append a line item
  edit <row> <field> <value>    field is name, price or quantity
  toggle <row> <buyer>          flip whether <buyer> shares <row>
  totals                        print what each buyer owes
  summary                       print receipt figures and subtotal
  help                          this text
  quit                          leave (nothing is saved)";

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let rest: Vec<&str> = words.collect();

        match verb.to_ascii_lowercase().as_str() {
            "show" | "items" | "ls" => Ok(SessionCommand::Show),
            "buyer" | "add" => Ok(SessionCommand::AddBuyer),
            "item" => match rest.as_slice() {
                [name @ .., price, quantity] if !name.is_empty() => Ok(SessionCommand::AddItem {
                    name: name.join(" "),
                    price: (*price).to_string(),
                    quantity: (*quantity).to_string(),
                }),
                _ => Err(CommandError::Usage("item <name> <price> <quantity>")),
            },
            "edit" => match rest.as_slice() {
                [row, field, value @ ..] => Ok(SessionCommand::Edit {
                    index: parse_row(row)?,
                    field: field
                        .parse()
                        .map_err(|_| CommandError::BadField((*field).to_string()))?,
                    value: value.join(" "),
                }),
                _ => Err(CommandError::Usage("edit <row> <field> <value>")),
            },
            "toggle" => match rest.as_slice() {
                [row, buyer @ ..] if !buyer.is_empty() => Ok(SessionCommand::Toggle {
                    index: parse_row(row)?,
                    buyer: buyer.join(" "),
                }),
                _ => Err(CommandError::Usage("toggle <row> <buyer>")),
            },
            "totals" => Ok(SessionCommand::Totals),
            "summary" => Ok(SessionCommand::Summary),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_row(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row - 1),
        _ => Err(CommandError::BadRow(raw.to_string())),
    }
}
