//! CSV export of a user's expenses

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::models::Expense;

const HEADER: [&str; 6] = ["ID", "Date", "Category", "Type", "Amount", "Description"];

/// Write `expenses` as CSV, one row per expense
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> TrackerResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADER).map_err(export_error)?;

    for expense in expenses {
        let date = expense
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        out.write_record([
            expense.id.to_string(),
            date,
            expense.category.clone(),
            expense.expense_type.to_string(),
            format!("{:.2}", expense.amount),
            expense.description.clone().unwrap_or_default(),
        ])
        .map_err(export_error)?;
    }

    out.flush()?;
    Ok(())
}

fn export_error(err: csv::Error) -> TrackerError {
    TrackerError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, DocumentId};
    use serde_json::json;

    fn expense(fields: serde_json::Value) -> Expense {
        Document::decode(DocumentId::new(), fields.as_object().unwrap())
            .into_entity()
            .unwrap()
    }

    #[test]
    fn test_export_expenses_csv() {
        let expenses = vec![
            expense(json!({
                "amount": 12.5,
                "category": "Food",
                "type": "one-time",
                "date": "2024-03-09",
                "description": "Lunch, with friends"
            })),
            expense(json!({"amount": "1200", "category": "Housing", "type": "fixed"})),
        ];

        let mut buffer = Vec::new();
        export_expenses_csv(&expenses, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "ID,Date,Category,Type,Amount,Description");
        assert!(lines[1].ends_with(",2024-03-09,Food,one-time,12.50,\"Lunch, with friends\""));
        assert!(lines[2].ends_with(",,Housing,fixed,1200.00,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_empty() {
        let mut buffer = Vec::new();
        export_expenses_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Date,Category,Type,Amount,Description\n"
        );
    }
}
