//! Display formatting for terminal output
//!
//! Lists render as tables; single records and the summary render as
//! aligned label/value lines.

pub mod budget;
pub mod expense;
pub mod paycheck;
pub mod summary;

pub use budget::format_budget_list;
pub use expense::{format_expense_details, format_expense_list};
pub use paycheck::format_paycheck;
pub use summary::format_summary;

/// Shorten `s` to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Weekly groceries run", 10), "Weekly ...");
        assert_eq!(truncate("abc", 2), "..");
    }
}
