use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use expense_tracker::cli::{
    handle_budget_command, handle_expense_command, handle_paycheck_command, BudgetCommands,
    ExpenseCommands, PaycheckCommands,
};
use expense_tracker::config::{Settings, TrackerPaths};
use expense_tracker::display::format_summary;
use expense_tracker::export::{export_expenses_csv, export_user_json, export_user_yaml, UserExport};
use expense_tracker::logging;
use expense_tracker::models::UserId;
use expense_tracker::session::UserData;
use expense_tracker::store::JsonFileStore;
use expense_tracker::TrackerError;

#[derive(Parser)]
#[command(
    name = "expenses",
    version,
    about = "Track a paycheck, expenses and budgets from the command line"
)]
struct Cli {
    /// Signed-in user id
    #[arg(short, long, global = true, env = "EXPENSE_TRACKER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Paycheck commands
    #[command(subcommand)]
    Paycheck(PaycheckCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show totals by category, type and budget
    Summary,

    /// Export the user's data
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create the data directory and write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Expenses only
    Csv,
    Json,
    Yaml,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    logging::init(&settings.log_filter);

    let command = match cli.command {
        Some(Commands::Init) => {
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialized expense tracker at: {}", paths.base_dir().display());
            return Ok(());
        }
        Some(Commands::Config) => {
            print_config(&paths, &settings);
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("Expense tracker");
            println!();
            println!("Run 'expenses --help' for usage information.");
            return Ok(());
        }
    };

    let user = cli
        .user
        .as_deref()
        .map(UserId::new)
        .transpose()?
        .ok_or(TrackerError::AuthenticationRequired)?;

    let store = Arc::new(JsonFileStore::open(&paths)?);
    let user_data = UserData::new(store, &settings);
    user_data.set_user(Some(user.clone())).await?;

    match command {
        Commands::Paycheck(cmd) => handle_paycheck_command(&user_data, &settings, cmd).await?,
        Commands::Expense(cmd) => handle_expense_command(&user_data, &settings, cmd).await?,
        Commands::Budget(cmd) => handle_budget_command(&user_data, &settings, cmd).await?,
        Commands::Summary => print!("{}", format_summary(&user_data.summary(), &settings)),
        Commands::Export { format, output } => {
            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(io::stdout().lock()),
            };

            let export = UserExport::from_state(user, user_data.snapshot());
            match format {
                ExportFormat::Csv => export_expenses_csv(&export.expenses, &mut writer)?,
                ExportFormat::Json => export_user_json(&export, &mut writer)?,
                ExportFormat::Yaml => export_user_yaml(&export, &mut writer)?,
            }
            writer.flush()?;

            if let Some(path) = output {
                eprintln!("Exported to {}", path.display());
            }
        }
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}

fn print_config(paths: &TrackerPaths, settings: &Settings) {
    println!("Expense Tracker Configuration");
    println!("=============================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Data directory:  {}", paths.data_dir().display());
    println!("Settings file:   {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Expense limit:   {}", settings.expense_limit);
    println!("  Page size:       {}", settings.page_size);
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Log filter:      {}", settings.log_filter);
}
