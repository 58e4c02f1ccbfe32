//! The expense record and the request payload shapes that carry it
//!
//! Only `ExpenseID` is typed: it is the table key. Every other attribute is
//! forwarded to the store exactly as the caller sent it.

use serde::Deserialize;
use serde_json::{Map, Value};

pub const EXPENSE_ID_ATTRIBUTE: &str = "ExpenseID";
pub const NAME_ATTRIBUTE: &str = "Name";
pub const AMOUNT_ATTRIBUTE: &str = "Amount";
pub const CATEGORY_ATTRIBUTE: &str = "Category";

/// A row of the expenses table as a JSON document, key included.
pub type ExpenseItem = Map<String, Value>;

/// Body of a create request: the key plus whatever else the caller stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expense {
    #[serde(rename = "ExpenseID")]
    pub expense_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Expense {
    /// The full document to store, with `ExpenseID` restored alongside the
    /// other attributes.
    pub fn to_item(&self) -> ExpenseItem {
        let mut item = self.attributes.clone();
        item.insert(
            EXPENSE_ID_ATTRIBUTE.to_string(),
            Value::String(self.expense_id.clone()),
        );
        item
    }
}

/// Body of an update request. The three mutable attributes must be present
/// but may hold any JSON value; other fields in the body are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseChanges {
    #[serde(rename = "ExpenseID")]
    pub expense_id: String,
    #[serde(rename = "Name")]
    pub name: Value,
    #[serde(rename = "Amount")]
    pub amount: Value,
    #[serde(rename = "Category")]
    pub category: Value,
}

impl ExpenseChanges {
    pub fn assignments(&self) -> [(&'static str, &Value); 3] {
        [
            (NAME_ATTRIBUTE, &self.name),
            (AMOUNT_ATTRIBUTE, &self.amount),
            (CATEGORY_ATTRIBUTE, &self.category),
        ]
    }

    /// Overwrites the mutable attributes of `item`, leaving the key and any
    /// other attributes as they were.
    pub fn apply_to(&self, item: &mut ExpenseItem) {
        for (name, value) in self.assignments() {
            item.insert(name.to_string(), value.clone());
        }
    }
}

/// Body of a delete request. Only the key is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpenseKey {
    #[serde(rename = "ExpenseID")]
    pub expense_id: String,
}
