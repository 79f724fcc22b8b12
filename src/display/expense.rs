//! Expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::config::Settings;
use crate::models::Expense;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    expense_type: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl ExpenseRow {
    fn new(expense: &Expense, settings: &Settings) -> Self {
        Self {
            id: expense.id.to_string(),
            date: format_date(expense, settings),
            category: truncate(&expense.category, 20),
            expense_type: expense.expense_type.to_string(),
            amount: settings.format_amount(expense.amount),
            description: truncate(expense.description.as_deref().unwrap_or(""), 30),
        }
    }
}

fn format_date(expense: &Expense, settings: &Settings) -> String {
    expense
        .date
        .map(|d| settings.format_date(d))
        .unwrap_or_else(|| "-".to_string())
}

/// Format expenses as a table
pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses.iter().map(|e| ExpenseRow::new(e, settings)).collect();
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    format!(
        "{}\n{} expense(s), total {}\n",
        Table::new(rows).with(Style::psql()),
        expenses.len(),
        settings.format_amount(total)
    )
}

/// Format a single expense with every stored field
pub fn format_expense_details(expense: &Expense, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", format_date(expense, settings)));
    output.push_str(&format!("Amount:      {}\n", settings.format_amount(expense.amount)));
    output.push_str(&format!("Category:    {}\n", expense.category));
    output.push_str(&format!("Type:        {}\n", expense.expense_type));

    if let Some(description) = &expense.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    for (field, value) in &expense.extra {
        output.push_str(&format!("{:12} {}\n", format!("{}:", field), value));
    }

    output
}
