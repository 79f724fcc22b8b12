//! Budget display formatting

use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::config::Settings;
use crate::models::Budget;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Other fields")]
    other: String,
}

const NAMED_FIELDS: [&str; 3] = ["name", "category", "amount"];

impl BudgetRow {
    fn new(budget: &Budget, settings: &Settings) -> Self {
        let other = budget
            .fields
            .iter()
            .filter(|(k, _)| !NAMED_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, s),
                _ => format!("{}={}", k, v),
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: budget.id.to_string(),
            name: truncate(budget.name().unwrap_or("-"), 20),
            category: budget.category().unwrap_or("-").to_string(),
            amount: budget
                .amount()
                .map(|a| settings.format_amount(a))
                .unwrap_or_else(|| "-".to_string()),
            other: truncate(&other, 40),
        }
    }
}

/// Format budgets as a table
pub fn format_budget_list(budgets: &[Budget], settings: &Settings) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows: Vec<BudgetRow> = budgets.iter().map(|b| BudgetRow::new(b, settings)).collect();
    format!("{}\n", Table::new(rows).with(Style::psql()))
}
