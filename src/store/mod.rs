//! Document store layer
//!
//! `DocumentStore` is the narrow, collection-agnostic contract the session
//! talks to. Every operation names its collection, and owner-scoped
//! operations only ever see documents whose `userId` matches the owner.
//! `JsonFileStore` implements the contract over one JSON file per collection.

pub mod cursor;
pub mod file_io;
pub mod json_store;
pub mod query;

pub use cursor::Cursor;
pub use file_io::{read_collection, write_collection};
pub use json_store::JsonFileStore;
pub use query::{Direction, OrderBy};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::error::TrackerResult;
use crate::models::{Document, DocumentId, UserId};

/// Collection names used by the application
pub mod collections {
    pub const PAYCHECKS: &str = "paychecks";
    pub const EXPENSES: &str = "expenses";
    pub const BUDGETS: &str = "budgets";
}

/// One page of an ordered listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    /// Points at the last returned document; `None` for an empty page
    pub cursor: Option<Cursor>,
    /// True iff the page is full. A full final page still reports `true`.
    pub has_more: bool,
}

/// Asynchronous document database contract
///
/// Operations are independent: there are no cross-call transactions and
/// concurrent writes to one document are last-write-wins.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Insert a new document, or overwrite the fields of `existing_id`
    ///
    /// `userId`, `createdAt` and `updatedAt` are assigned here; caller values
    /// for them are discarded.
    async fn save_or_update(
        &self,
        collection: &str,
        owner: &UserId,
        data: Map<String, Value>,
        existing_id: Option<DocumentId>,
    ) -> TrackerResult<DocumentId>;

    /// All of the owner's documents, optionally ordered and capped
    async fn get_all_for_owner(
        &self,
        collection: &str,
        owner: &UserId,
        order: Option<OrderBy>,
        limit: Option<usize>,
    ) -> TrackerResult<Vec<Document>>;

    /// Fetch one of the owner's documents; `Ok(None)` when it does not exist
    ///
    /// A document owned by someone else fails with `Store`.
    async fn get_by_id(
        &self,
        collection: &str,
        owner: &UserId,
        id: DocumentId,
    ) -> TrackerResult<Option<Document>>;

    /// Remove one of the owner's documents
    ///
    /// Removing an absent id is not an error; removing someone else's
    /// document fails with `Store`.
    async fn delete(&self, collection: &str, owner: &UserId, id: DocumentId) -> TrackerResult<()>;

    /// Delete every id concurrently; any single failure fails the call
    ///
    /// Deletes that already succeeded are not rolled back.
    async fn batch_delete(
        &self,
        collection: &str,
        owner: &UserId,
        ids: &[DocumentId],
    ) -> TrackerResult<()> {
        try_join_all(ids.iter().map(|id| self.delete(collection, owner, *id))).await?;
        Ok(())
    }

    /// Owner's documents with `date_field` in `[start, end]`, newest first
    async fn get_by_date_range(
        &self,
        collection: &str,
        owner: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        date_field: &str,
    ) -> TrackerResult<Vec<Document>>;

    /// Owner's documents whose `field` equals `value`
    async fn search(
        &self,
        collection: &str,
        owner: &UserId,
        field: &str,
        value: &Value,
    ) -> TrackerResult<Vec<Document>>;

    /// Up to `page_size` documents ordered descending by `order_field`,
    /// starting after `cursor`
    async fn get_paginated(
        &self,
        collection: &str,
        owner: &UserId,
        order_field: &str,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> TrackerResult<Page>;
}
