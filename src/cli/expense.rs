//! Expense CLI commands

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Subcommand;
use serde_json::Value;

use super::parse_id;
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{DocumentId, Expense, ExpenseDraft, ExpenseType, Timestamp};
use crate::session::UserData;
use crate::store::{Cursor, DocumentStore};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "12" or "12.50")
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Expense date (YYYY-MM-DD, defaults to now)
        #[arg(short, long)]
        date: Option<String>,
        /// Expense type: fixed, recurring or one-time
        #[arg(short = 't', long = "type", default_value = "one-time")]
        expense_type: String,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Show a single expense
    Show {
        /// Expense ID
        id: String,
    },

    /// List loaded expenses, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only this expense type
        #[arg(short = 't', long = "type")]
        expense_type: Option<String>,
        /// Number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List expenses dated within an inclusive range
    Range {
        /// First day (YYYY-MM-DD)
        start: String,
        /// Last day (YYYY-MM-DD), included in full
        end: String,
    },

    /// List expenses whose field equals a value
    Find {
        /// Field name (e.g., "category")
        field: String,
        /// Value to match; numbers and booleans are matched as such
        value: String,
    },

    /// Show one page of expenses
    Page {
        /// Expenses per page (defaults to the configured page size)
        #[arg(short, long)]
        size: Option<usize>,
        /// Cursor printed with the previous page
        #[arg(short, long)]
        cursor: Option<String>,
    },

    /// Delete one or more expenses
    Delete {
        /// Expense IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Handle an expense command
pub async fn handle_expense_command<S: DocumentStore>(
    user_data: &UserData<S>,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            expense_type,
            description,
        } => {
            let mut draft = ExpenseDraft::new(amount, category).with_type(expense_type.parse()?);
            if let Some(date) = date {
                draft = draft.with_date(parse_day(&date)?.to_rfc3339());
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }

            let id = user_data.save_expense(draft, None).await?;
            println!("Added expense {}", id);
        }

        ExpenseCommands::Edit {
            id,
            amount,
            category,
            date,
            expense_type,
            description,
        } => {
            let id = parse_id(&id)?;
            let existing = load_expense(user_data, id).await?;

            let mut draft = ExpenseDraft::new(
                amount.map(Value::String).unwrap_or_else(|| existing.amount.into()),
                category.unwrap_or(existing.category),
            )
            .with_type(match expense_type {
                Some(t) => t.parse()?,
                None => existing.expense_type,
            });
            draft = match date {
                Some(date) => draft.with_date(parse_day(&date)?.to_rfc3339()),
                None => draft.with_date(existing.date.map(|d| Timestamp::from(d).to_value())),
            };
            if let Some(description) = description.or(existing.description) {
                draft = draft.with_description(description);
            }

            user_data.save_expense(draft, Some(id)).await?;
            println!("Updated expense {}", id);
        }

        ExpenseCommands::Show { id } => {
            let expense = load_expense(user_data, parse_id(&id)?).await?;
            print!("{}", format_expense_details(&expense, settings));
        }

        ExpenseCommands::List {
            category,
            expense_type,
            limit,
        } => {
            let mut expenses = match &category {
                Some(category) => user_data.get_expenses_by_category(category),
                None => user_data.expenses(),
            };
            if let Some(expense_type) = expense_type {
                let expense_type: ExpenseType = expense_type.parse()?;
                expenses.retain(|e| e.expense_type == expense_type);
            }
            if let Some(limit) = limit {
                expenses.truncate(limit);
            }
            print!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Range { start, end } => {
            let start = parse_day(&start)?;
            let end = parse_day(&end)? + Duration::days(1) - Duration::nanoseconds(1);
            if end < start {
                return Err(TrackerError::Validation(
                    "Range end is before its start".into(),
                ));
            }
            let expenses = user_data.get_expenses_by_date_range(start, end).await?;
            print!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Find { field, value } => {
            let expenses = user_data
                .search_expenses(&field, &parse_search_value(&value))
                .await?;
            print!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Page { size, cursor } => {
            let cursor = cursor.map(|c| c.parse::<Cursor>()).transpose()?;
            let page = user_data
                .expense_page(size.unwrap_or(settings.page_size), cursor.as_ref())
                .await?;
            print!("{}", format_expense_list(&page.expenses, settings));
            if let (true, Some(cursor)) = (page.has_more, &page.cursor) {
                println!("Next page: --cursor {}", cursor);
            }
        }

        ExpenseCommands::Delete { ids } => {
            let ids = ids
                .iter()
                .map(|raw| parse_id(raw))
                .collect::<TrackerResult<Vec<_>>>()?;
            match ids.as_slice() {
                [id] => user_data.delete_expense(*id).await?,
                _ => user_data.batch_delete_expenses(&ids).await?,
            }
            println!("Deleted {} expense(s)", ids.len());
        }
    }

    Ok(())
}

async fn load_expense<S: DocumentStore>(
    user_data: &UserData<S>,
    id: DocumentId,
) -> TrackerResult<Expense> {
    user_data
        .get_expense(id)
        .await?
        .ok_or_else(|| TrackerError::Validation(format!("Expense not found: {}", id)))
}

/// Parse a YYYY-MM-DD day as its first instant in UTC
fn parse_day(raw: &str) -> TrackerResult<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| TrackerError::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", raw)))
}

fn parse_search_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => serde_json::json!(n),
            _ => Value::String(raw.to_string()),
        },
    }
}
