//! Expense model
//!
//! Expenses are stored in the `expenses` collection with a coerced numeric
//! amount, a timestamp date, a category and an expense type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use super::coerce::{
    coerce_date, coerce_number, lenient_date, lenient_number, lenient_opt_string, lenient_string,
};
use super::ids::{DocumentId, UserId};
use super::timestamp::Timestamp;
use crate::error::TrackerError;

/// How often an expense occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseType {
    /// Same amount every period (rent, insurance)
    Fixed,
    /// Repeats but may vary (utilities, groceries)
    Recurring,
    #[default]
    OneTime,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Recurring => "recurring",
            Self::OneTime => "one-time",
        }
    }

    pub fn all() -> [ExpenseType; 3] {
        [Self::Fixed, Self::Recurring, Self::OneTime]
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "recurring" => Ok(Self::Recurring),
            "one-time" | "one_time" | "onetime" => Ok(Self::OneTime),
            other => Err(TrackerError::Validation(format!(
                "Unknown expense type '{}' (expected fixed, recurring or one-time)",
                other
            ))),
        }
    }
}

// Unknown stored types decode as one-time rather than failing the whole load
impl<'de> Deserialize<'de> for ExpenseType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: DocumentId,

    #[serde(default)]
    pub user_id: Option<UserId>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: f64,

    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(default, rename = "type")]
    pub expense_type: ExpenseType,

    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Any additional fields the front end stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Expense {
    /// Check whether the expense date falls within `[start, end]`
    pub fn is_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.date.is_some_and(|d| d >= start && d <= end)
    }
}

/// Expense input as it arrives from a form
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// Raw amount; coerced to a number on write
    pub amount: Value,
    /// Raw date; coerced to a timestamp on write
    pub date: Value,
    pub category: String,
    pub expense_type: ExpenseType,
    pub description: Option<String>,
    pub extra: Map<String, Value>,
}

impl ExpenseDraft {
    pub fn new(amount: impl Into<Value>, category: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            date: Value::Null,
            category: category.into(),
            expense_type: ExpenseType::default(),
            description: None,
            extra: Map::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<Value>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = expense_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The amount after coercion
    pub fn coerced_amount(&self) -> f64 {
        coerce_number(&self.amount)
    }

    /// Produce the field map written to the store
    pub fn into_fields(self) -> Map<String, Value> {
        let amount = self.coerced_amount();
        let date = coerce_date(&self.date);

        let mut fields = self.extra;
        fields.insert("amount".into(), json!(amount));
        fields.insert("date".into(), Timestamp::from(date).to_value());
        fields.insert("category".into(), Value::String(self.category));
        fields.insert("type".into(), Value::String(self.expense_type.to_string()));
        if let Some(description) = self.description {
            fields.insert("description".into(), Value::String(description));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use chrono::TimeZone;

    #[test]
    fn test_expense_type_parse() {
        assert_eq!("fixed".parse::<ExpenseType>().unwrap(), ExpenseType::Fixed);
        assert_eq!("One-Time".parse::<ExpenseType>().unwrap(), ExpenseType::OneTime);
        assert!("weekly".parse::<ExpenseType>().is_err());
    }

    #[test]
    fn test_expense_type_serde() {
        assert_eq!(serde_json::to_string(&ExpenseType::OneTime).unwrap(), "\"one-time\"");
        let parsed: ExpenseType = serde_json::from_str("\"recurring\"").unwrap();
        assert_eq!(parsed, ExpenseType::Recurring);
        let unknown: ExpenseType = serde_json::from_str("\"sometimes\"").unwrap();
        assert_eq!(unknown, ExpenseType::OneTime);
    }

    #[test]
    fn test_draft_coerces_fields() {
        let fields = ExpenseDraft::new("12.50", "Food")
            .with_date("2025-01-05")
            .with_type(ExpenseType::Recurring)
            .into_fields();

        let expected_date = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(fields["amount"], json!(12.5));
        assert_eq!(fields["date"], Timestamp::from(expected_date).to_value());
        assert_eq!(fields["category"], json!("Food"));
        assert_eq!(fields["type"], json!("recurring"));
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn test_draft_non_numeric_amount_is_zero() {
        let draft = ExpenseDraft::new("lots", "Fun");
        assert_eq!(draft.coerced_amount(), 0.0);
        assert_eq!(draft.into_fields()["amount"], json!(0.0));
    }

    #[test]
    fn test_decode_from_document() {
        let id = DocumentId::new();
        let fields = json!({
            "userId": "alice",
            "amount": "40",
            "date": "2025-02-01T00:00:00Z",
            "category": "Travel",
            "type": "fixed",
            "note": "train",
        });
        let doc = Document::decode(id, fields.as_object().unwrap());
        let expense: Expense = doc.into_entity().unwrap();

        assert_eq!(expense.id, id);
        assert_eq!(expense.amount, 40.0);
        assert_eq!(expense.expense_type, ExpenseType::Fixed);
        assert_eq!(expense.user_id.as_ref().map(UserId::as_str), Some("alice"));
        assert_eq!(expense.extra.get("note"), Some(&json!("train")));
        assert!(expense.is_within(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        ));
    }
}
