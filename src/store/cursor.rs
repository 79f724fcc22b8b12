//! Opaque pagination cursors

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::TrackerError;
use crate::models::DocumentId;

/// Token referencing the last document of a returned page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn after(id: DocumentId) -> Self {
        Self(URL_SAFE_NO_PAD.encode(id.to_string()))
    }

    /// Recover the document id this cursor points at
    pub fn document_id(&self) -> Result<DocumentId, TrackerError> {
        let invalid = || TrackerError::Store(format!("Invalid cursor: {}", self.0));
        let bytes = URL_SAFE_NO_PAD.decode(&self.0).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        DocumentId::parse(&text).map_err(|_| invalid())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cursor {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cursor = Self(s.trim().to_string());
        cursor.document_id()?;
        Ok(cursor)
    }
}
