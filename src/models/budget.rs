//! Budget model
//!
//! Budgets are free-form documents. The conventional fields are `name`,
//! `category` and `amount`, but any others are kept as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coerce::{coerce_number, lenient_date};
use super::ids::{DocumentId, UserId};

/// A stored budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: DocumentId,

    #[serde(default)]
    pub user_id: Option<UserId>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Budget {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.fields.get("category").and_then(Value::as_str)
    }

    /// Budgeted amount, if one was recorded
    pub fn amount(&self) -> Option<f64> {
        self.fields.get("amount").map(coerce_number)
    }
}

/// Budget input: arbitrary fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetDraft {
    pub fields: Map<String, Value>,
}

impl BudgetDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Parse a `key=value` pair; numeric values are stored as numbers
    pub fn parse_assignment(pair: &str) -> Option<(String, Value)> {
        let (key, raw) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        let raw = raw.trim();
        let value = match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => serde_json::json!(n),
            _ => Value::String(raw.to_string()),
        };
        Some((key.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use serde_json::json;

    #[test]
    fn test_budget_accessors() {
        let doc = Document::decode(
            DocumentId::new(),
            json!({"name": "Groceries", "category": "Food", "amount": "300"})
                .as_object()
                .unwrap(),
        );
        let budget: Budget = doc.into_entity().unwrap();
        assert_eq!(budget.name(), Some("Groceries"));
        assert_eq!(budget.category(), Some("Food"));
        assert_eq!(budget.amount(), Some(300.0));
        assert!(budget.get("missing").is_none());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            BudgetDraft::parse_assignment("amount=250"),
            Some(("amount".to_string(), json!(250.0)))
        );
        assert_eq!(
            BudgetDraft::parse_assignment("name = Rent"),
            Some(("name".to_string(), json!("Rent")))
        );
        assert_eq!(BudgetDraft::parse_assignment("novalue"), None);
        assert_eq!(BudgetDraft::parse_assignment("=5"), None);
    }
}
