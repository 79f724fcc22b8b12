//! JSON export of everything one user has stored

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Budget, Expense, Paycheck, UserId};
use crate::session::SessionState;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full export of one user's data
#[derive(Debug, Clone, Serialize)]
pub struct UserExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub user_id: UserId,
    pub paycheck: Option<Paycheck>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

impl UserExport {
    /// Capture the loaded data of `user`
    pub fn from_state(user: UserId, state: SessionState) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user_id: user,
            paycheck: state.paycheck,
            expenses: state.expenses,
            budgets: state.budgets,
        }
    }
}

/// Write the export as pretty-printed JSON
pub fn export_user_json<W: Write>(export: &UserExport, writer: &mut W) -> TrackerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, DocumentId};
    use serde_json::{json, Value};

    fn sample_state() -> SessionState {
        let expense: Expense = Document::decode(
            DocumentId::new(),
            json!({"amount": 9.99, "category": "Music", "type": "recurring", "userId": "alice"})
                .as_object()
                .unwrap(),
        )
        .into_entity()
        .unwrap();
        SessionState {
            expenses: vec![expense],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_user_json() {
        let export = UserExport::from_state(UserId::new("alice").unwrap(), sample_state());

        let mut buffer = Vec::new();
        export_user_json(&export, &mut buffer).unwrap();
        let parsed: Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(parsed["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed["user_id"], "alice");
        assert_eq!(parsed["paycheck"], Value::Null);
        assert_eq!(parsed["expenses"][0]["category"], "Music");
        assert_eq!(parsed["expenses"][0]["type"], "recurring");
        assert_eq!(parsed["budgets"], json!([]));
    }
}
