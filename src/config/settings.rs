//! User settings for the expense tracker
//!
//! Controls how much data a session loads, how pages are sized, how amounts
//! and dates are shown, and the default log filter.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::TrackerError;

/// User settings, persisted as `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Maximum number of expenses a session loads (newest first by date)
    #[serde(default = "default_expense_limit")]
    pub expense_limit: usize,

    /// Default page size for paginated listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_expense_limit() -> usize {
    500
}

fn default_page_size() -> usize {
    20
}

fn default_currency() -> String {
    "$".to_string()
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            expense_limit: default_expense_limit(),
            page_size: default_page_size(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, TrackerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TrackerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TrackerError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), TrackerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TrackerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings that would break display or loading
    pub fn validate(&self) -> Result<(), TrackerError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(TrackerError::Config(format!(
                "Invalid date_format '{}'",
                self.date_format
            )));
        }
        if self.page_size == 0 {
            return Err(TrackerError::Config("page_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Format a date with the configured format, or `%Y-%m-%d` if it is invalid
    pub fn format_date(&self, date: DateTime<Utc>) -> String {
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.date_format)) {
            Ok(()) => out,
            Err(_) => date.format(DEFAULT_DATE_FORMAT).to_string(),
        }
    }

    /// Format an amount with the configured currency symbol
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.expense_limit, 500);
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            expense_limit: 50,
            currency_symbol: "€".into(),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.expense_limit, 50);
        assert_eq!(loaded.currency_symbol, "€");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"page_size": 5}"#).unwrap();
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.expense_limit, 500);
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_invalid_date_format_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"date_format": "%Q"}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_format_date_falls_back() {
        let date = Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap();
        let settings = Settings {
            date_format: "%d/%m/%Y".into(),
            ..Settings::default()
        };
        assert_eq!(settings.format_date(date), "02/04/2025");

        let broken = Settings {
            date_format: "%Q".into(),
            ..Settings::default()
        };
        assert!(broken.validate().is_err());
        assert_eq!(broken.format_date(date), "2025-04-02");
    }

    #[test]
    fn test_format_amount() {
        let settings = Settings::default();
        assert_eq!(settings.format_amount(5000.5), "$5000.50");
        assert_eq!(settings.format_amount(-12.0), "-$12.00");
    }
}
