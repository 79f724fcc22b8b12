//! Native timestamp representation of the document store
//!
//! Dates are written as `{"_seconds": i64, "_nanoseconds": u32}` objects and
//! decoded back to RFC 3339 strings when documents are read.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A point in time as stored in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanoseconds).single()
    }

    /// Encode as a JSON value for storage
    pub fn to_value(self) -> Value {
        serde_json::json!({
            "_seconds": self.seconds,
            "_nanoseconds": self.nanoseconds,
        })
    }

    /// Recognize a stored timestamp object
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.len() != 2 {
            return None;
        }
        let seconds = obj.get("_seconds")?.as_i64()?;
        let nanoseconds = u32::try_from(obj.get("_nanoseconds")?.as_u64()?).ok()?;
        Some(Self {
            seconds,
            nanoseconds,
        })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }
}

/// Render a date the way decoded documents carry it
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Interpret any supported date representation
///
/// Accepts stored timestamp objects, RFC 3339 strings, `YYYY-MM-DD` strings
/// (midnight UTC) and epoch milliseconds.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(_) => Timestamp::from_value(value)?.to_datetime(),
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Parse an RFC 3339 or `YYYY-MM-DD` string
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_round_trip() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let value = Timestamp::from(dt).to_value();
        assert_eq!(value, json!({"_seconds": dt.timestamp(), "_nanoseconds": 0}));
        assert_eq!(parse_date_value(&value), Some(dt));
    }

    #[test]
    fn test_non_timestamp_objects_ignored() {
        assert!(Timestamp::from_value(&json!({"_seconds": 1})).is_none());
        assert!(Timestamp::from_value(&json!({"_seconds": 1, "_nanoseconds": 0, "x": 1})).is_none());
        assert!(Timestamp::from_value(&json!("2025-01-01")).is_none());
    }

    #[test]
    fn test_parse_date_strings() {
        let midnight = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_date_str("2025-01-05"), Some(midnight));
        assert_eq!(parse_date_str("2025-01-05T00:00:00Z"), Some(midnight));
        assert_eq!(parse_date_str("2025-01-05T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_date_str("yesterday"), None);
    }

    #[test]
    fn test_parse_epoch_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(parse_date_value(&json!(dt.timestamp_millis())), Some(dt));
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(format_datetime(dt), "2025-01-05T00:00:00Z");
    }
}
