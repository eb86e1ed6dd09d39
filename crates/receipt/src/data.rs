use serde::{Deserialize, Deserializer, Serialize};

use tabsplit_splitting::amount::sanitize;
use tabsplit_splitting::{LineItemDraft, parse_amount};

/// Payload produced by the extraction service.
///
/// Numeric fields accept numbers, numeric strings or `null`; anything that
/// is not a usable number becomes `0`, the same rule user edits follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptData {
    /// Display only.
    #[serde(default)]
    pub date: Option<String>,
    /// Display only.
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<ReceiptProduct>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub taxes: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptProduct {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,
}

impl ReceiptData {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Seed items for the ledger, in receipt order.
    pub fn line_item_drafts(&self) -> Vec<LineItemDraft> {
        self.products
            .iter()
            .map(|p| LineItemDraft::new(p.name.clone(), p.price, p.quantity))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) => sanitize(n),
        Some(NumberOrText::Text(s)) => parse_amount(&s),
        None => 0.0,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_payload() {
        let data = ReceiptData::from_json_str(
            r#"{
                "date": "2024-11-02",
                "store": "Corner Shop",
                "products": [
                    {"name": "Milk", "price": 2.0, "quantity": 1},
                    {"name": "Bread", "price": 3, "quantity": 2}
                ],
                "taxes": 0.4,
                "total": 8.4
            }"#,
        )
        .unwrap();

        assert_eq!(data.store.as_deref(), Some("Corner Shop"));
        assert_eq!(data.products.len(), 2);
        assert_eq!(data.products[1].quantity, 2.0);
        assert_eq!(data.taxes, 0.4);
        assert_eq!(data.total, 8.4);
    }

    #[test]
    fn missing_or_null_fields_default() {
        let data = ReceiptData::from_json_str(r#"{"products": null, "taxes": null}"#).unwrap();
        assert!(data.products.is_empty());
        assert_eq!(data.taxes, 0.0);
        assert_eq!(data.total, 0.0);
        assert_eq!(data.date, None);

        let data = ReceiptData::from_json_str("{}").unwrap();
        assert_eq!(data, ReceiptData::default());
    }

    #[test]
    fn numeric_strings_are_parsed_leniently() {
        let data = ReceiptData::from_json_str(
            r#"{"products": [{"name": null, "price": "4.20", "quantity": "x"}], "total": "-3"}"#,
        )
        .unwrap();

        let p = &data.products[0];
        assert_eq!(p.name, "");
        assert_eq!(p.price, 4.2);
        assert_eq!(p.quantity, 0.0);
        assert_eq!(data.total, 0.0);
    }

    #[test]
    fn drafts_keep_receipt_order() {
        let data = ReceiptData {
            products: vec![
                ReceiptProduct {
                    name: "A".into(),
                    price: 1.0,
                    quantity: 1.0,
                },
                ReceiptProduct {
                    name: "B".into(),
                    price: 2.0,
                    quantity: 3.0,
                },
            ],
            ..ReceiptData::default()
        };

        let drafts = data.line_item_drafts();
        assert_eq!(drafts[0], LineItemDraft::new("A", 1.0, 1.0));
        assert_eq!(drafts[1], LineItemDraft::new("B", 2.0, 3.0));
    }

    #[test]
    fn structurally_wrong_payload_is_an_error() {
        assert!(ReceiptData::from_json_str(r#"{"products": 5}"#).is_err());
        assert!(ReceiptData::from_json_str("not json").is_err());
    }
}
