use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tabsplit_core::{DomainError, LineItemId};

use crate::amount::{LenientAmount, sanitize};

/// A receipt line as it arrives from extraction, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemDraft {
    pub name: String,
    pub unit_price: f64,
    pub quantity: f64,
}

impl LineItemDraft {
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Bind the draft to its ledger-assigned id, clamping amounts into range.
    pub(crate) fn into_item(self, id: LineItemId) -> LineItem {
        LineItem {
            id,
            name: self.name,
            unit_price: sanitize(self.unit_price),
            quantity: sanitize(self.quantity),
        }
    }
}

/// One line of the receipt being split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    name: String,
    unit_price: f64,
    quantity: f64,
}

impl LineItem {
    pub fn id_typed(&self) -> LineItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity
    }

    pub(crate) fn apply_change(&mut self, change: &FieldChange) {
        match change {
            FieldChange::Name(name) => self.name.clone_from(name),
            FieldChange::UnitPrice(v) => self.unit_price = *v,
            FieldChange::Quantity(v) => self.quantity = *v,
        }
    }
}

/// Editable column of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Name,
    UnitPrice,
    Quantity,
}

impl ItemField {
    /// Interpret raw user text for this field.
    ///
    /// Never fails: names are kept verbatim, numbers go through the lenient
    /// amount parser. The flag reports whether numeric text was coerced.
    pub fn interpret(self, raw: &str) -> (FieldChange, bool) {
        match self {
            ItemField::Name => (FieldChange::Name(raw.to_string()), false),
            ItemField::UnitPrice => {
                let amount = LenientAmount::parse(raw);
                (FieldChange::UnitPrice(amount.value), amount.coerced)
            }
            ItemField::Quantity => {
                let amount = LenientAmount::parse(raw);
                (FieldChange::Quantity(amount.value), amount.coerced)
            }
        }
    }
}

impl core::fmt::Display for ItemField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ItemField::Name => "name",
            ItemField::UnitPrice => "unit_price",
            ItemField::Quantity => "quantity",
        };
        f.write_str(s)
    }
}

impl FromStr for ItemField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ItemField::Name),
            "price" | "unit_price" | "unitprice" => Ok(ItemField::UnitPrice),
            "quantity" | "qty" => Ok(ItemField::Quantity),
            other => Err(DomainError::not_found(format!("item field `{other}`"))),
        }
    }
}

/// A resolved field edit, as recorded in events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    Name(String),
    UnitPrice(f64),
    Quantity(f64),
}

impl FieldChange {
    pub fn field(&self) -> ItemField {
        match self {
            FieldChange::Name(_) => ItemField::Name,
            FieldChange::UnitPrice(_) => ItemField::UnitPrice,
            FieldChange::Quantity(_) => ItemField::Quantity,
        }
    }
}
