//! Spending summary
//!
//! Totals computed from whatever a session has loaded: overall spend, spend
//! per category and per expense type, what is left of the gross salary, and
//! how each categorised budget is holding up.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Budget, DocumentId, Expense, ExpenseType, Paycheck};

/// Spend within one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Spend against one budget that names a category and an amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub budget_id: DocumentId,
    pub name: String,
    pub category: String,
    pub budgeted: f64,
    pub spent: f64,
}

impl BudgetUsage {
    pub fn remaining(&self) -> f64 {
        self.budgeted - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.budgeted
    }
}

/// Aggregate view over loaded data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub gross_salary: f64,
    pub total_expenses: f64,
    pub expense_count: usize,
    pub by_category: Vec<CategoryTotal>,
    pub by_type: Vec<(ExpenseType, f64)>,
    pub budget_usage: Vec<BudgetUsage>,
}

impl ExpenseSummary {
    pub fn build(paycheck: Option<&Paycheck>, expenses: &[Expense], budgets: &[Budget]) -> Self {
        let mut categories: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        let mut types: BTreeMap<ExpenseType, f64> = BTreeMap::new();

        for expense in expenses {
            let entry = categories.entry(expense.category.as_str()).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
            *types.entry(expense.expense_type).or_default() += expense.amount;
        }

        let budget_usage = budgets
            .iter()
            .filter_map(|budget| {
                let category = budget.category()?;
                let budgeted = budget.amount()?;
                let spent = categories.get(category).map(|(t, _)| *t).unwrap_or(0.0);
                Some(BudgetUsage {
                    budget_id: budget.id,
                    name: budget.name().unwrap_or(category).to_string(),
                    category: category.to_string(),
                    budgeted,
                    spent,
                })
            })
            .collect();

        Self {
            gross_salary: paycheck.map(|p| p.gross_salary).unwrap_or(0.0),
            total_expenses: expenses.iter().map(|e| e.amount).sum(),
            expense_count: expenses.len(),
            by_category: categories
                .into_iter()
                .map(|(category, (total, count))| CategoryTotal {
                    category: category.to_string(),
                    total,
                    count,
                })
                .collect(),
            by_type: types.into_iter().collect(),
            budget_usage,
        }
    }

    /// Gross salary left after all loaded expenses
    pub fn remaining(&self) -> f64 {
        self.gross_salary - self.total_expenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, PaycheckDraft, UserId};
    use serde_json::json;

    fn expense(amount: f64, category: &str, expense_type: &str) -> Expense {
        let fields = json!({"amount": amount, "category": category, "type": expense_type});
        Document::decode(DocumentId::new(), fields.as_object().unwrap())
            .into_entity()
            .unwrap()
    }

    fn budget(fields: serde_json::Value) -> Budget {
        Document::decode(DocumentId::new(), fields.as_object().unwrap())
            .into_entity()
            .unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExpenseSummary::build(None, &[], &[]);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.remaining(), 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.budget_usage.is_empty());
    }

    #[test]
    fn test_totals_by_category_and_type() {
        let paycheck = Paycheck::from_draft(
            DocumentId::new(),
            UserId::new("alice").unwrap(),
            PaycheckDraft::new(3000),
            None,
        );
        let expenses = vec![
            expense(1200.0, "Housing", "fixed"),
            expense(80.0, "Food", "recurring"),
            expense(45.5, "Food", "one-time"),
        ];

        let summary = ExpenseSummary::build(Some(&paycheck), &expenses, &[]);

        assert_eq!(summary.total_expenses, 1325.5);
        assert_eq!(summary.remaining(), 1674.5);
        assert_eq!(summary.expense_count, 3);
        assert_eq!(
            summary.by_category,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: 125.5,
                    count: 2
                },
                CategoryTotal {
                    category: "Housing".into(),
                    total: 1200.0,
                    count: 1
                },
            ]
        );
        assert_eq!(
            summary.by_type,
            vec![
                (ExpenseType::Fixed, 1200.0),
                (ExpenseType::Recurring, 80.0),
                (ExpenseType::OneTime, 45.5),
            ]
        );
    }

    #[test]
    fn test_budget_usage() {
        let expenses = vec![expense(80.0, "Food", "recurring"), expense(40.0, "Food", "one-time")];
        let budgets = vec![
            budget(json!({"name": "Groceries", "category": "Food", "amount": 100})),
            budget(json!({"category": "Travel", "amount": "250"})),
            budget(json!({"name": "No category", "amount": 10})),
        ];

        let summary = ExpenseSummary::build(None, &expenses, &budgets);

        assert_eq!(summary.budget_usage.len(), 2);
        let food = &summary.budget_usage[0];
        assert_eq!(food.name, "Groceries");
        assert_eq!(food.spent, 120.0);
        assert!(food.is_over());
        assert_eq!(food.remaining(), -20.0);

        let travel = &summary.budget_usage[1];
        assert_eq!(travel.name, "Travel");
        assert_eq!(travel.spent, 0.0);
        assert_eq!(travel.budgeted, 250.0);
    }
}
