//! Core data models for the expense tracker
//!
//! Documents, identifiers and timestamps shared with the store, plus the
//! typed paycheck, expense and budget entities decoded from documents.

pub mod budget;
pub mod coerce;
pub mod document;
pub mod expense;
pub mod ids;
pub mod paycheck;
pub mod timestamp;

pub use budget::{Budget, BudgetDraft};
pub use coerce::{coerce_date, coerce_number, coerce_text};
pub use document::{decode_all, Document};
pub use expense::{Expense, ExpenseDraft, ExpenseType};
pub use ids::{DocumentId, UserId};
pub use paycheck::{Paycheck, PaycheckDraft};
pub use timestamp::Timestamp;
