//! Schema-flexible documents
//!
//! A `Document` is what the store hands back: its id plus a field map in
//! which timestamp fields have already been decoded to RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::DocumentId;
use super::timestamp::{format_datetime, parse_date_str, Timestamp};
use crate::error::TrackerError;

/// Owner id field present on every document
pub const USER_ID_FIELD: &str = "userId";
/// Assigned on insert
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Assigned on every write
pub const UPDATED_AT_FIELD: &str = "updatedAt";
/// Default field for date-range queries
pub const DATE_FIELD: &str = "date";

/// Fields decoded from the native timestamp form on read
pub const TIMESTAMP_FIELDS: [&str; 3] = [CREATED_AT_FIELD, UPDATED_AT_FIELD, DATE_FIELD];

/// Fields the store owns; caller-supplied values are discarded on write
pub const RESERVED_FIELDS: [&str; 4] = ["id", USER_ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// A decoded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Build a decoded document from stored fields
    pub fn decode(id: DocumentId, stored: &Map<String, Value>) -> Self {
        let mut fields = stored.clone();
        for name in TIMESTAMP_FIELDS {
            if let Some(value) = fields.get_mut(name) {
                if let Some(dt) = Timestamp::from_value(value).and_then(Timestamp::to_datetime) {
                    *value = Value::String(format_datetime(dt));
                }
            }
        }
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn owner(&self) -> Option<&str> {
        self.fields.get(USER_ID_FIELD).and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_field(CREATED_AT_FIELD)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.date_field(UPDATED_AT_FIELD)
    }

    /// Read a decoded date field
    pub fn date_field(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .and_then(parse_date_str)
    }

    /// Deserialize into a typed entity, with `id` merged into the fields
    pub fn into_entity<T: DeserializeOwned>(self) -> Result<T, TrackerError> {
        let mut object = self.fields;
        object.insert("id".into(), Value::String(self.id.to_string()));
        serde_json::from_value(Value::Object(object)).map_err(|e| {
            TrackerError::Json(format!("Failed to decode document {}: {}", self.id, e))
        })
    }
}

/// Decode a list of documents into typed entities
pub fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, TrackerError> {
    docs.into_iter().map(Document::into_entity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn stored(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_decode_converts_timestamp_fields() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap();
        let ts = Timestamp::from(dt).to_value();
        let doc = Document::decode(
            DocumentId::new(),
            &stored(json!({
                "userId": "alice",
                "createdAt": ts.clone(),
                "updatedAt": ts.clone(),
                "date": ts.clone(),
                "other": ts.clone(),
            })),
        );

        assert_eq!(doc.get("date"), Some(&json!("2025-01-05T10:00:00Z")));
        assert_eq!(doc.created_at(), Some(dt));
        assert_eq!(doc.updated_at(), Some(dt));
        assert_eq!(doc.owner(), Some("alice"));
        // Only the well-known timestamp fields are decoded
        assert_eq!(doc.get("other"), Some(&ts));
    }

    #[test]
    fn test_decode_passes_plain_values_through() {
        let doc = Document::decode(
            DocumentId::new(),
            &stored(json!({"date": "2025-01-05", "amount": 3.5})),
        );
        assert_eq!(doc.get("date"), Some(&json!("2025-01-05")));
        assert_eq!(doc.get("amount"), Some(&json!(3.5)));
        assert!(doc.created_at().is_none());
    }

    #[test]
    fn test_into_entity_injects_id() {
        #[derive(Deserialize)]
        struct Named {
            id: DocumentId,
            name: String,
        }

        let id = DocumentId::new();
        let doc = Document::decode(id, &stored(json!({"name": "rent"})));
        let named: Named = doc.into_entity().unwrap();
        assert_eq!(named.id, id);
        assert_eq!(named.name, "rent");
    }
}
