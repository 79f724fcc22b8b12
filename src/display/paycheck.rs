//! Paycheck display formatting

use crate::config::Settings;
use crate::models::Paycheck;

/// Format the current paycheck, or a hint when none is stored
pub fn format_paycheck(paycheck: Option<&Paycheck>, settings: &Settings) -> String {
    let Some(paycheck) = paycheck else {
        return "No paycheck recorded. Use `expenses paycheck set <amount>`.\n".to_string();
    };

    let mut output = String::new();
    output.push_str(&format!(
        "Gross salary: {}\n",
        settings.format_amount(paycheck.gross_salary)
    ));
    if let Some(updated) = paycheck.updated_at {
        output.push_str(&format!("Updated:      {}\n", settings.format_date(updated)));
    }
    for (field, value) in &paycheck.extra {
        output.push_str(&format!("{:13} {}\n", format!("{}:", field), value));
    }

    output
}
