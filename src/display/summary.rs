//! Summary display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::services::ExpenseSummary;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct BudgetUsageRow {
    #[tabled(rename = "Budget")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

/// Format the spending summary
pub fn format_summary(summary: &ExpenseSummary, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Gross salary:   {}\n",
        settings.format_amount(summary.gross_salary)
    ));
    output.push_str(&format!(
        "Total expenses: {} ({} expense(s))\n",
        settings.format_amount(summary.total_expenses),
        summary.expense_count
    ));
    output.push_str(&format!(
        "Remaining:      {}\n",
        settings.format_amount(summary.remaining())
    ));

    if !summary.by_type.is_empty() {
        output.push('\n');
        for (expense_type, total) in &summary.by_type {
            output.push_str(&format!(
                "  {:10} {}\n",
                expense_type,
                settings.format_amount(*total)
            ));
        }
    }

    if !summary.by_category.is_empty() {
        let rows = summary.by_category.iter().map(|c| CategoryRow {
            category: c.category.clone(),
            count: c.count,
            total: settings.format_amount(c.total),
        });
        output.push('\n');
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }

    if !summary.budget_usage.is_empty() {
        let rows = summary.budget_usage.iter().map(|u| BudgetUsageRow {
            name: u.name.clone(),
            category: u.category.clone(),
            budgeted: settings.format_amount(u.budgeted),
            spent: settings.format_amount(u.spent),
            remaining: if u.is_over() {
                format!("{} (over)", settings.format_amount(u.remaining()))
            } else {
                settings.format_amount(u.remaining())
            },
        });
        output.push('\n');
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }

    output
}
