//! Paycheck CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_paycheck;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{BudgetDraft, PaycheckDraft};
use crate::session::UserData;
use crate::store::DocumentStore;

/// Paycheck subcommands
#[derive(Subcommand)]
pub enum PaycheckCommands {
    /// Record the gross salary, replacing any previous paycheck
    Set {
        /// Gross salary (e.g., "5000" or "5000.50")
        gross_salary: String,
        /// Extra field to store, as key=value (repeatable)
        #[arg(short, long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Show the current paycheck
    Show,
}

/// Handle a paycheck command
pub async fn handle_paycheck_command<S: DocumentStore>(
    user_data: &UserData<S>,
    settings: &Settings,
    cmd: PaycheckCommands,
) -> TrackerResult<()> {
    match cmd {
        PaycheckCommands::Set {
            gross_salary,
            fields,
        } => {
            let mut draft = PaycheckDraft::new(gross_salary);
            for pair in &fields {
                let (key, value) = BudgetDraft::parse_assignment(pair).ok_or_else(|| {
                    TrackerError::Validation(format!("Expected KEY=VALUE, got '{}'", pair))
                })?;
                draft = draft.with_field(key, value);
            }

            user_data.save_paycheck(draft).await?;
            print!("{}", format_paycheck(user_data.paycheck().as_ref(), settings));
        }

        PaycheckCommands::Show => {
            print!("{}", format_paycheck(user_data.paycheck().as_ref(), settings));
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
    async fn test_set_paycheck_with_fields() {
        let settings = Settings::default();
        let user_data = UserData::new(Arc::new(JsonFileStore::in_memory()), &settings);
        user_data
            .set_user(Some(UserId::new("alice").unwrap()))
            .await
            .unwrap();

        handle_paycheck_command(
            &user_data,
            &settings,
            PaycheckCommands::Set {
                gross_salary: "4200.75".into(),
                fields: vec!["employer=Acme".into()],
            },
        )
        .await
        .unwrap();

        let paycheck = user_data.paycheck().unwrap();
        assert_eq!(paycheck.gross_salary, 4200.75);
        assert_eq!(paycheck.extra["employer"], "Acme");
    }

    #[tokio::test]
    async fn test_set_paycheck_rejects_bad_field() {
        let settings = Settings::default();
        let user_data = UserData::new(Arc::new(JsonFileStore::in_memory()), &settings);
        user_data
            .set_user(Some(UserId::new("alice").unwrap()))
            .await
            .unwrap();

        let result = handle_paycheck_command(
            &user_data,
            &settings,
            PaycheckCommands::Set {
                gross_salary: "100".into(),
                fields: vec!["no-equals-sign".into()],
            },
        )
        .await;
        assert!(matches!(result, Err(TrackerError::Validation(_))));
        assert!(user_data.paycheck().is_none());
    }
}
