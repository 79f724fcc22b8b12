//! JSON file document store
//!
//! Each collection lives in `<data_dir>/<collection>.json`. Collections are
//! loaded lazily into memory on first use and written back atomically after
//! every mutation. Documents are keyed by id, so unordered listings come back
//! in id order.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::cursor::Cursor;
use super::file_io::{read_collection, write_collection};
use super::query::{in_date_range, OrderBy};
use super::{DocumentStore, Page};
use crate::config::paths::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::document::{CREATED_AT_FIELD, RESERVED_FIELDS, UPDATED_AT_FIELD, USER_ID_FIELD};
use crate::models::{Document, DocumentId, Timestamp, UserId};

type Fields = Map<String, Value>;
type Collection = BTreeMap<DocumentId, Fields>;

/// On-disk layout of one collection file
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CollectionData {
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoredDocument {
    id: DocumentId,
    #[serde(default)]
    fields: Fields,
}

/// Document store persisted as JSON files
pub struct JsonFileStore {
    /// `None` keeps every collection in memory only
    data_dir: Option<PathBuf>,
    collections: RwLock<HashMap<String, Collection>>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Open the store in the configured data directory
    pub fn open(paths: &TrackerPaths) -> TrackerResult<Self> {
        paths.ensure_directories()?;
        Ok(Self::new(paths.data_dir()))
    }

    /// Create a store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            collections: RwLock::new(HashMap::new()),
        }
    }

    fn collection_path(&self, collection: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", collection)))
    }

    fn validate_collection(collection: &str) -> TrackerResult<()> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(TrackerError::Store(format!(
                "Invalid collection name: '{}'",
                collection
            )))
        }
    }

    fn load_collection(&self, collection: &str) -> TrackerResult<Collection> {
        let Some(path) = self.collection_path(collection) else {
            return Ok(Collection::new());
        };
        let data: CollectionData = read_collection(collection, &path)?;
        debug!(collection, count = data.documents.len(), "loaded collection file");
        Ok(data
            .documents
            .into_iter()
            .map(|doc| (doc.id, doc.fields))
            .collect())
    }

    fn persist(&self, collection: &str, docs: &Collection) -> TrackerResult<()> {
        let Some(path) = self.collection_path(collection) else {
            return Ok(());
        };
        let data = CollectionData {
            documents: docs
                .iter()
                .map(|(id, fields)| StoredDocument {
                    id: *id,
                    fields: fields.clone(),
                })
                .collect(),
        };
        write_collection(collection, &path, &data)
    }

    /// Run `f` against a collection, loading it first if needed
    fn read<T>(&self, collection: &str, f: impl FnOnce(&Collection) -> T) -> TrackerResult<T> {
        Self::validate_collection(collection)?;
        {
            let collections = self
                .collections
                .read()
                .map_err(|e| TrackerError::Store(format!("Failed to acquire read lock: {}", e)))?;
            if let Some(docs) = collections.get(collection) {
                return Ok(f(docs));
            }
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|e| TrackerError::Store(format!("Failed to acquire write lock: {}", e)))?;
        if !collections.contains_key(collection) {
            let loaded = self.load_collection(collection)?;
            collections.insert(collection.to_string(), loaded);
        }
        let docs = collections
            .get(collection)
            .ok_or_else(|| TrackerError::Store(format!("Collection unavailable: {}", collection)))?;
        Ok(f(docs))
    }

    /// Apply `f` to a copy of a collection, persist it, then publish it
    ///
    /// A failed write leaves the in-memory collection untouched.
    fn mutate<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Collection) -> TrackerResult<T>,
    ) -> TrackerResult<T> {
        Self::validate_collection(collection)?;
        let mut collections = self
            .collections
            .write()
            .map_err(|e| TrackerError::Store(format!("Failed to acquire write lock: {}", e)))?;

        let mut docs = match collections.get(collection) {
            Some(docs) => docs.clone(),
            None => self.load_collection(collection)?,
        };
        let result = f(&mut docs)?;
        self.persist(collection, &docs)?;
        collections.insert(collection.to_string(), docs);
        Ok(result)
    }

    /// The owner's stored documents, ordered if requested
    fn owned(
        &self,
        collection: &str,
        owner: &UserId,
        order: Option<&OrderBy>,
    ) -> TrackerResult<Vec<(DocumentId, Fields)>> {
        let mut docs = self.read(collection, |docs| {
            docs.iter()
                .filter(|(_, fields)| is_owned_by(fields, owner))
                .map(|(id, fields)| (*id, fields.clone()))
                .collect::<Vec<_>>()
        })?;
        if let Some(order) = order {
            // Stable sort keeps id order among equal keys
            docs.sort_by(|(_, a), (_, b)| order.compare(a, b));
        }
        Ok(docs)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn is_owned_by(fields: &Fields, owner: &UserId) -> bool {
    fields.get(USER_ID_FIELD).and_then(Value::as_str) == Some(owner.as_str())
}

/// Fail unless `owner` owns the stored document
fn check_owner(
    collection: &str,
    id: DocumentId,
    fields: &Fields,
    owner: &UserId,
) -> TrackerResult<()> {
    if is_owned_by(fields, owner) {
        Ok(())
    } else {
        Err(TrackerError::Store(format!(
            "Permission denied: {}/{} is not owned by {}",
            collection, id, owner
        )))
    }
}

fn decode(docs: Vec<(DocumentId, Fields)>) -> Vec<Document> {
    docs.into_iter()
        .map(|(id, fields)| Document::decode(id, &fields))
        .collect()
}

impl DocumentStore for JsonFileStore {
    async fn save_or_update(
        &self,
        collection: &str,
        owner: &UserId,
        data: Map<String, Value>,
        existing_id: Option<DocumentId>,
    ) -> TrackerResult<DocumentId> {
        let mut fields = data;
        for reserved in RESERVED_FIELDS {
            fields.remove(reserved);
        }
        let now = Timestamp::now().to_value();

        let result = self.mutate(collection, |docs| match existing_id {
            Some(id) => {
                let doc = docs.get_mut(&id).ok_or_else(|| {
                    TrackerError::Store(format!("No document to update: {}/{}", collection, id))
                })?;
                check_owner(collection, id, doc, owner)?;
                doc.extend(fields);
                doc.insert(UPDATED_AT_FIELD.into(), now);
                Ok(id)
            }
            None => {
                let id = DocumentId::new();
                fields.insert(USER_ID_FIELD.into(), Value::String(owner.to_string()));
                fields.insert(CREATED_AT_FIELD.into(), now.clone());
                fields.insert(UPDATED_AT_FIELD.into(), now);
                docs.insert(id, fields);
                Ok(id)
            }
        });

        match &result {
            Ok(id) if existing_id.is_some() => info!(collection, %id, "document updated"),
            Ok(id) => info!(collection, %id, "document created"),
            Err(e) => warn!(collection, error = %e, "save failed"),
        }
        result
    }

    async fn get_all_for_owner(
        &self,
        collection: &str,
        owner: &UserId,
        order: Option<OrderBy>,
        limit: Option<usize>,
    ) -> TrackerResult<Vec<Document>> {
        let mut docs = self.owned(collection, owner, order.as_ref())?;
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        debug!(collection, %owner, count = docs.len(), "fetched owner documents");
        Ok(decode(docs))
    }

    async fn get_by_id(
        &self,
        collection: &str,
        owner: &UserId,
        id: DocumentId,
    ) -> TrackerResult<Option<Document>> {
        self.read(collection, |docs| match docs.get(&id) {
            Some(fields) => {
                check_owner(collection, id, fields, owner)?;
                Ok(Some(Document::decode(id, fields)))
            }
            None => Ok(None),
        })?
    }

    async fn delete(&self, collection: &str, owner: &UserId, id: DocumentId) -> TrackerResult<()> {
        let result = self.mutate(collection, |docs| {
            if let Some(fields) = docs.get(&id) {
                check_owner(collection, id, fields, owner)?;
            }
            docs.remove(&id);
            Ok(())
        });
        match &result {
            Ok(()) => info!(collection, %id, "document deleted"),
            Err(e) => warn!(collection, %id, error = %e, "delete failed"),
        }
        result
    }

    async fn get_by_date_range(
        &self,
        collection: &str,
        owner: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        date_field: &str,
    ) -> TrackerResult<Vec<Document>> {
        let order = OrderBy::desc(date_field);
        let docs: Vec<_> = self
            .owned(collection, owner, Some(&order))?
            .into_iter()
            .filter(|(_, fields)| in_date_range(fields, date_field, start, end))
            .collect();
        debug!(collection, %owner, count = docs.len(), "date range query");
        Ok(decode(docs))
    }

    async fn search(
        &self,
        collection: &str,
        owner: &UserId,
        field: &str,
        value: &Value,
    ) -> TrackerResult<Vec<Document>> {
        let docs: Vec<_> = self
            .owned(collection, owner, None)?
            .into_iter()
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .collect();
        Ok(decode(docs))
    }

    async fn get_paginated(
        &self,
        collection: &str,
        owner: &UserId,
        order_field: &str,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> TrackerResult<Page> {
        if page_size == 0 {
            return Err(TrackerError::Validation("Page size must be at least 1".into()));
        }

        let order = OrderBy::desc(order_field);
        let docs = self.owned(collection, owner, Some(&order))?;

        let start = match cursor {
            Some(cursor) => {
                let after = cursor.document_id()?;
                let position = docs.iter().position(|(id, _)| *id == after).ok_or_else(|| {
                    TrackerError::Store(format!("Cursor no longer matches a document: {}", cursor))
                })?;
                position + 1
            }
            None => 0,
        };

        let page: Vec<_> = docs.into_iter().skip(start).take(page_size).collect();
        let cursor = page.last().map(|(id, _)| Cursor::after(*id));
        let has_more = page.len() == page_size;

        Ok(Page {
            documents: decode(page),
            cursor,
            has_more,
        })
    }
}
