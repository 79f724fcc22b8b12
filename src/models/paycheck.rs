//! Paycheck model
//!
//! Each user has at most one current paycheck document, holding the gross
//! salary plus any other fields the front end records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::coerce::{coerce_number, lenient_date, lenient_number};
use super::document::RESERVED_FIELDS;
use super::ids::{DocumentId, UserId};

/// A stored paycheck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paycheck {
    pub id: DocumentId,

    #[serde(default)]
    pub user_id: Option<UserId>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub gross_salary: f64,

    #[serde(default, deserialize_with = "lenient_date")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Paycheck {
    /// Build the local view of a paycheck just written from `draft`
    pub fn from_draft(
        id: DocumentId,
        owner: UserId,
        draft: PaycheckDraft,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        let gross_salary = draft.coerced_gross_salary();
        // Keys held in typed fields would serialize twice
        let mut extra = draft.extra;
        for key in RESERVED_FIELDS.iter().chain(&["grossSalary"]) {
            extra.remove(*key);
        }
        Self {
            id,
            user_id: Some(owner),
            gross_salary,
            created_at: created_at.or(Some(now)),
            updated_at: Some(now),
            extra,
        }
    }
}

/// Paycheck input as it arrives from a form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaycheckDraft {
    /// Raw gross salary; coerced to a number on write
    pub gross_salary: Value,
    pub extra: Map<String, Value>,
}

impl PaycheckDraft {
    pub fn new(gross_salary: impl Into<Value>) -> Self {
        Self {
            gross_salary: gross_salary.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn coerced_gross_salary(&self) -> f64 {
        coerce_number(&self.gross_salary)
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = self.extra.clone();
        fields.insert("grossSalary".into(), json!(self.coerced_gross_salary()));
        fields
    }
}
