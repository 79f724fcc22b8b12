//! Service layer for the expense tracker
//!
//! Computations layered on top of the data a session has loaded.

pub mod summary;

pub use summary::{BudgetUsage, CategoryTotal, ExpenseSummary};
