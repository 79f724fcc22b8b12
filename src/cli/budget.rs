//! Budget CLI commands

use clap::Subcommand;

use super::parse_id;
use crate::config::Settings;
use crate::display::format_budget_list;
use crate::error::{TrackerError, TrackerResult};
use crate::models::BudgetDraft;
use crate::session::UserData;
use crate::store::DocumentStore;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget, or update one with --id
    Set {
        /// Budget to update
        #[arg(long)]
        id: Option<String>,
        /// Fields as key=value (e.g., name=Groceries category=Food amount=300)
        #[arg(required = true, value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// List budgets, newest first
    List,

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

/// Handle a budget command
pub async fn handle_budget_command<S: DocumentStore>(
    user_data: &UserData<S>,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TrackerResult<()> {
    match cmd {
        BudgetCommands::Set { id, fields } => {
            let existing_id = id.as_deref().map(parse_id).transpose()?;
            let mut draft = BudgetDraft::new();
            for pair in &fields {
                let (key, value) = BudgetDraft::parse_assignment(pair).ok_or_else(|| {
                    TrackerError::Validation(format!("Expected KEY=VALUE, got '{}'", pair))
                })?;
                draft = draft.with_field(key, value);
            }

            let id = user_data.save_budget(draft, existing_id).await?;
            match existing_id {
                Some(_) => println!("Updated budget {}", id),
                None => println!("Created budget {}", id),
            }
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&user_data.budgets(), settings));
        }

        BudgetCommands::Delete { id } => {
            let id = parse_id(&id)?;
            user_data.delete_budget(id).await?;
            println!("Deleted budget {}", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::store::JsonFileStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_update_delete_budget() {
        let settings = Settings::default();
        let user_data = UserData::new(Arc::new(JsonFileStore::in_memory()), &settings);
        user_data
            .set_user(Some(UserId::new("alice").unwrap()))
            .await
            .unwrap();

        handle_budget_command(
            &user_data,
            &settings,
            BudgetCommands::Set {
                id: None,
                fields: vec!["name=Groceries".into(), "category=Food".into(), "amount=300".into()],
            },
        )
        .await
        .unwrap();
        let budget = user_data.budgets()[0].clone();
        assert_eq!(budget.amount(), Some(300.0));

        handle_budget_command(
            &user_data,
            &settings,
            BudgetCommands::Set {
                id: Some(budget.id.to_string()),
                fields: vec!["amount=350".into()],
            },
        )
        .await
        .unwrap();
        let updated = &user_data.budgets()[0];
        assert_eq!(updated.amount(), Some(350.0));
        assert_eq!(updated.name(), Some("Groceries"));

        handle_budget_command(
            &user_data,
            &settings,
            BudgetCommands::Delete {
                id: budget.id.to_string(),
            },
        )
        .await
        .unwrap();
        assert!(user_data.budgets().is_empty());
    }
}
