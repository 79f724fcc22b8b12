//! Collection file I/O
//!
//! A collection file is replaced wholesale on every write: the new contents go
//! to a sibling temp file which is then renamed over the old one, so readers
//! only ever see a complete collection.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{TrackerError, TrackerResult};

fn failure(collection: &str, action: &str, cause: impl Display) -> TrackerError {
    TrackerError::Store(format!("Collection '{}': failed to {}: {}", collection, action, cause))
}

/// Sibling temp path, unique per process so concurrent writers never share it
fn temp_path(path: &Path) -> PathBuf {
    path.with_extension(format!("json.{}.tmp", std::process::id()))
}

/// Read a collection file; a missing file is an empty collection
pub fn read_collection<T>(collection: &str, path: &Path) -> TrackerResult<T>
where
    T: DeserializeOwned + Default,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(failure(collection, "open file", e)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| failure(collection, &format!("parse {}", path.display()), e))
}

/// Replace a collection file atomically
pub fn write_collection<T>(collection: &str, path: &Path, data: &T) -> TrackerResult<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| failure(collection, "create data directory", e))?;
    }

    let temp = temp_path(path);
    let written = File::create(&temp)
        .map_err(|e| failure(collection, "create temp file", e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, data)
                .map_err(|e| failure(collection, "serialize documents", e))?;
            writer.flush().map_err(|e| failure(collection, "flush", e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| failure(collection, "sync", e))
        })
        .and_then(|()| fs::rename(&temp, path).map_err(|e| failure(collection, "replace file", e)));

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Docs {
        ids: Vec<u32>,
    }

    #[test]
    fn test_missing_file_is_empty_collection() {
        let temp_dir = TempDir::new().unwrap();
        let docs: Docs = read_collection("expenses", &temp_dir.path().join("expenses.json")).unwrap();
        assert_eq!(docs, Docs::default());
    }

    #[test]
    fn test_write_replaces_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("budgets.json");

        write_collection("budgets", &path, &Docs { ids: vec![1] }).unwrap();
        write_collection("budgets", &path, &Docs { ids: vec![1, 2] }).unwrap();

        assert!(!temp_path(&path).exists());
        let loaded: Docs = read_collection("budgets", &path).unwrap();
        assert_eq!(loaded.ids, vec![1, 2]);
    }

    #[test]
    fn test_corrupt_file_names_collection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paychecks.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_collection::<Docs>("paychecks", &path).unwrap_err();
        assert!(err.is_store());
        assert!(err.to_string().contains("Collection 'paychecks'"));
    }
}
