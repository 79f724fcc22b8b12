//! CLI command handlers
//!
//! Bridges clap argument parsing with the session layer. Handlers are
//! generic over the document store so tests can drive them in memory.

pub mod budget;
pub mod expense;
pub mod paycheck;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use paycheck::{handle_paycheck_command, PaycheckCommands};

use crate::error::{TrackerError, TrackerResult};
use crate::models::DocumentId;

/// Parse a document id given on the command line
pub fn parse_id(raw: &str) -> TrackerResult<DocumentId> {
    DocumentId::parse(raw.trim())
        .map_err(|_| TrackerError::Validation(format!("Invalid id '{}'", raw)))
}
