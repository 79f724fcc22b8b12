//! Snapshot of one user's loaded data

use serde::Serialize;

use crate::models::{Budget, Expense, Paycheck};

/// What the front end renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(rename = "paycheckData")]
    pub paycheck: Option<Paycheck>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.paycheck.is_none() && self.expenses.is_empty() && self.budgets.is_empty()
    }
}
