//! Ordering and filtering over stored field values
//!
//! Mixed-type values order the way the hosted database orders them:
//! null < booleans < numbers < timestamps < strings < arrays < maps.
//! Documents missing the order field always sort last.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::models::timestamp::{parse_date_value, Timestamp};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// Ordering of a listing by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Order by `field`, newest/largest first
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Compare two documents' field maps under this ordering
    pub fn compare(&self, a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        match (a.get(&self.field), b.get(&self.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                match self.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Object(_) if Timestamp::from_value(value).is_some() => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

/// Total order over JSON field values
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(i, j)| compare_values(i, j))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(_), Value::Object(_)) => {
            match (Timestamp::from_value(a), Timestamp::from_value(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => a.to_string().cmp(&b.to_string()),
            }
        }
        _ => Ordering::Equal,
    }
}

/// Check whether `field` holds a date within `[start, end]`
pub fn in_date_range(
    fields: &Map<String, Value>,
    field: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    fields
        .get(field)
        .and_then(parse_date_value)
        .is_some_and(|d| d >= start && d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mixed_type_ranking() {
        let ts = Timestamp::from(Utc::now()).to_value();
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &ts), Ordering::Less);
        assert_eq!(compare_values(&ts, &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!("a"), &json!([1])), Ordering::Less);
    }

    #[test]
    fn test_timestamps_compare_chronologically() {
        let early = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).to_value();
        let late = Timestamp::from(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()).to_value();
        assert_eq!(compare_values(&early, &late), Ordering::Less);
    }

    #[test]
    fn test_missing_field_sorts_last_both_directions() {
        let with = map(json!({"amount": 5}));
        let without = map(json!({}));
        assert_eq!(OrderBy::desc("amount").compare(&with, &without), Ordering::Less);
        assert_eq!(OrderBy::asc("amount").compare(&with, &without), Ordering::Less);
    }

    #[test]
    fn test_descending_reverses() {
        let small = map(json!({"amount": 1}));
        let large = map(json!({"amount": 2.5}));
        assert_eq!(OrderBy::desc("amount").compare(&large, &small), Ordering::Less);
        assert_eq!(OrderBy::asc("amount").compare(&large, &small), Ordering::Greater);
    }

    #[test]
    fn test_in_date_range_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let on_start = map(json!({"date": Timestamp::from(start).to_value()}));
        let on_end = map(json!({"date": "2025-01-31"}));
        let after = map(json!({"date": "2025-02-01"}));
        let missing = map(json!({}));

        assert!(in_date_range(&on_start, "date", start, end));
        assert!(in_date_range(&on_end, "date", start, end));
        assert!(!in_date_range(&after, "date", start, end));
        assert!(!in_date_range(&missing, "date", start, end));
    }
}
