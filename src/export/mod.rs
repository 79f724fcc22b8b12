//! Export module for the expense tracker
//!
//! - CSV: expenses only, spreadsheet-compatible
//! - JSON: everything a user has stored, machine-readable
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_expenses_csv;
pub use json::{export_user_json, UserExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_user_yaml;
