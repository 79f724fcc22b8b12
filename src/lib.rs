//! Expense tracker - per-user paycheck, expense and budget records
//!
//! This library is the data layer behind a personal expense tracker. Each
//! signed-in user owns one paycheck, a list of expenses and a set of budgets,
//! all kept as documents in a store that scopes every query by owner.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Documents, identifiers and the typed entities
//! - `store`: The `DocumentStore` seam and its JSON file backend
//! - `session`: `UserData`, the per-user state container
//! - `services`: Summaries computed over loaded data
//! - `export`: CSV, JSON and YAML export
//! - `display`, `cli`: Terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use expense_tracker::config::{Settings, TrackerPaths};
//! use expense_tracker::models::{ExpenseDraft, UserId};
//! use expense_tracker::session::UserData;
//! use expense_tracker::store::JsonFileStore;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let user_data = UserData::new(Arc::new(JsonFileStore::open(&paths)?), &settings);
//! user_data.set_user(Some(UserId::new("alice")?)).await?;
//! user_data.save_expense(ExpenseDraft::new("12.50", "Food"), None).await?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

pub use error::{TrackerError, TrackerResult};
