//! YAML export of everything one user has stored

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::export::json::UserExport;

/// Write the export as YAML with a short comment header
pub fn export_user_yaml<W: Write>(export: &UserExport, writer: &mut W) -> TrackerResult<()> {
    writeln!(writer, "# Expense tracker export for {}", export.user_id)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(&mut *writer, export).map_err(|e| TrackerError::Export(e.to_string()))?;
    Ok(())
}
