//! Per-user session over the document store
//!
//! `UserData` owns the snapshot of one signed-in user's paycheck, expenses
//! and budgets and keeps it in step with the store. Every async operation
//! clears the error and raises `loading` when it starts; a failure is both
//! recorded in the snapshot and returned to the caller.
//!
//! Operations take `&self` and may overlap. Nothing is queued or cancelled,
//! so whichever operation finishes last decides the snapshot.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::state::SessionState;
use crate::config::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::document::{CREATED_AT_FIELD, DATE_FIELD};
use crate::models::{
    decode_all, Budget, BudgetDraft, Document, DocumentId, Expense, ExpenseDraft, ExpenseType,
    Paycheck, PaycheckDraft, UserId,
};
use crate::services::ExpenseSummary;
use crate::store::collections::{BUDGETS, EXPENSES, PAYCHECKS};
use crate::store::{Cursor, DocumentStore, OrderBy};

/// A page of expenses for incremental listing
#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub cursor: Option<Cursor>,
    pub has_more: bool,
}

struct Loaded {
    paycheck: Option<Paycheck>,
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
}

/// Session-scoped state container for one user
pub struct UserData<S> {
    store: Arc<S>,
    expense_limit: usize,
    user: RwLock<Option<UserId>>,
    state: Mutex<SessionState>,
}

impl<S: DocumentStore> UserData<S> {
    /// Create a signed-out session
    pub fn new(store: Arc<S>, settings: &Settings) -> Self {
        Self::with_expense_limit(store, settings.expense_limit)
    }

    /// Create a signed-out session loading at most `expense_limit` expenses
    pub fn with_expense_limit(store: Arc<S>, expense_limit: usize) -> Self {
        Self {
            store,
            expense_limit,
            user: RwLock::new(None),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.lock());
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_user(&self) -> TrackerResult<UserId> {
        self.user().ok_or(TrackerError::AuthenticationRequired)
    }

    /// Identity presented to the store by deletes, which skip the local
    /// sign-in check; the store rejects an anonymous caller
    fn acting_user(&self) -> TrackerResult<UserId> {
        self.user()
            .ok_or_else(|| TrackerError::Store("Permission denied: not signed in".into()))
    }

    /// Clone of the current snapshot
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn paycheck(&self) -> Option<Paycheck> {
        self.lock().paycheck.clone()
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.lock().expenses.clone()
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.lock().budgets.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }

    /// Run an operation with loading/error bookkeeping
    async fn track<T, F>(&self, operation: &'static str, op: F) -> TrackerResult<T>
    where
        F: Future<Output = TrackerResult<T>>,
    {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = op.await;

        self.update(|s| {
            s.loading = false;
            if let Err(e) = &result {
                s.error = Some(e.to_string());
            }
        });
        if let Err(e) = &result {
            warn!(operation, error = %e, "session operation failed");
        }
        result
    }

    /// React to the identity provider reporting a new user (or none)
    pub async fn set_user(&self, user: Option<UserId>) -> TrackerResult<()> {
        match user {
            Some(user) => {
                *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
                self.load_user_data(&user).await
            }
            None => {
                self.sign_out();
                Ok(())
            }
        }
    }

    /// Forget the user and empty the snapshot without touching the store
    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.lock() = SessionState::default();
        debug!("session cleared");
    }

    /// Re-run the full load for the current user
    pub async fn refresh_data(&self) -> TrackerResult<()> {
        match self.user() {
            Some(user) => self.load_user_data(&user).await,
            None => {
                self.sign_out();
                Ok(())
            }
        }
    }

    async fn load_user_data(&self, owner: &UserId) -> TrackerResult<()> {
        self.track("load", async {
            let loaded = self.fetch_all(owner).await?;
            debug!(
                %owner,
                expenses = loaded.expenses.len(),
                budgets = loaded.budgets.len(),
                "user data loaded"
            );
            self.update(|s| {
                s.paycheck = loaded.paycheck;
                s.expenses = loaded.expenses;
                s.budgets = loaded.budgets;
            });
            Ok(())
        })
        .await
    }

    async fn fetch_all(&self, owner: &UserId) -> TrackerResult<Loaded> {
        let (paychecks, expenses, budgets) = tokio::try_join!(
            self.store.get_all_for_owner(PAYCHECKS, owner, None, None),
            self.store.get_all_for_owner(
                EXPENSES,
                owner,
                Some(OrderBy::desc(DATE_FIELD)),
                Some(self.expense_limit),
            ),
            self.fetch_budget_documents(owner),
        )?;

        let paycheck = match paychecks.into_iter().next() {
            Some(doc) => Some(doc.into_entity::<Paycheck>()?),
            None => None,
        };

        Ok(Loaded {
            paycheck,
            expenses: decode_all(expenses)?,
            budgets: decode_all(budgets)?,
        })
    }

    async fn fetch_budget_documents(&self, owner: &UserId) -> TrackerResult<Vec<Document>> {
        self.store
            .get_all_for_owner(BUDGETS, owner, Some(OrderBy::desc(CREATED_AT_FIELD)), None)
            .await
    }

    /// Overwrite the user's paycheck, creating it only if none exists
    pub async fn save_paycheck(&self, draft: PaycheckDraft) -> TrackerResult<DocumentId> {
        self.track("save_paycheck", async move {
            let owner = self.require_user()?;
            let existing = self
                .store
                .get_all_for_owner(PAYCHECKS, &owner, None, Some(1))
                .await?
                .into_iter()
                .next();
            let existing_id = existing.as_ref().map(|doc| doc.id);
            let created_at = existing.as_ref().and_then(Document::created_at);

            let id = self
                .store
                .save_or_update(PAYCHECKS, &owner, draft.to_fields(), existing_id)
                .await?;

            let paycheck = Paycheck::from_draft(id, owner, draft, created_at);
            self.update(|s| s.paycheck = Some(paycheck));
            Ok(id)
        })
        .await
    }

    /// Write an expense, then reload every collection
    pub async fn save_expense(
        &self,
        draft: ExpenseDraft,
        existing_id: Option<DocumentId>,
    ) -> TrackerResult<DocumentId> {
        self.track("save_expense", async move {
            let owner = self.require_user()?;
            let id = self
                .store
                .save_or_update(EXPENSES, &owner, draft.into_fields(), existing_id)
                .await?;

            let loaded = self.fetch_all(&owner).await?;
            self.update(|s| {
                s.paycheck = loaded.paycheck;
                s.expenses = loaded.expenses;
                s.budgets = loaded.budgets;
            });
            Ok(id)
        })
        .await
    }

    /// Delete one expense and drop it from the snapshot
    pub async fn delete_expense(&self, id: DocumentId) -> TrackerResult<()> {
        self.track("delete_expense", async move {
            let owner = self.acting_user()?;
            self.store.delete(EXPENSES, &owner, id).await?;
            self.update(|s| s.expenses.retain(|e| e.id != id));
            Ok(())
        })
        .await
    }

    /// Delete several expenses; the snapshot only changes if all succeed
    pub async fn batch_delete_expenses(&self, ids: &[DocumentId]) -> TrackerResult<()> {
        self.track("batch_delete_expenses", async move {
            let owner = self.acting_user()?;
            self.store.batch_delete(EXPENSES, &owner, ids).await?;
            let removed: HashSet<DocumentId> = ids.iter().copied().collect();
            self.update(|s| s.expenses.retain(|e| !removed.contains(&e.id)));
            Ok(())
        })
        .await
    }

    /// Fetch one of the user's expenses from the store
    pub async fn get_expense(&self, id: DocumentId) -> TrackerResult<Option<Expense>> {
        self.track("get_expense", async move {
            let owner = self.require_user()?;
            match self.store.get_by_id(EXPENSES, &owner, id).await? {
                Some(doc) => Ok(Some(doc.into_entity()?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Query the store for expenses dated within `[start, end]`
    ///
    /// The snapshot's expense list is left as it is.
    pub async fn get_expenses_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> TrackerResult<Vec<Expense>> {
        self.track("get_expenses_by_date_range", async move {
            let owner = self.require_user()?;
            let docs = self
                .store
                .get_by_date_range(EXPENSES, &owner, start, end, DATE_FIELD)
                .await?;
            decode_all(docs)
        })
        .await
    }

    /// Query the store for expenses whose `field` equals `value`
    pub async fn search_expenses(&self, field: &str, value: &Value) -> TrackerResult<Vec<Expense>> {
        self.track("search_expenses", async move {
            let owner = self.require_user()?;
            let docs = self.store.search(EXPENSES, &owner, field, value).await?;
            decode_all(docs)
        })
        .await
    }

    /// Fetch one page of expenses, newest first
    pub async fn expense_page(
        &self,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> TrackerResult<ExpensePage> {
        self.track("expense_page", async move {
            let owner = self.require_user()?;
            let page = self
                .store
                .get_paginated(EXPENSES, &owner, DATE_FIELD, page_size, cursor)
                .await?;
            Ok(ExpensePage {
                expenses: decode_all(page.documents)?,
                cursor: page.cursor,
                has_more: page.has_more,
            })
        })
        .await
    }

    /// Loaded expenses in `category`
    pub fn get_expenses_by_category(&self, category: &str) -> Vec<Expense> {
        self.lock()
            .expenses
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Loaded expenses of one type
    pub fn get_expenses_by_type(&self, expense_type: ExpenseType) -> Vec<Expense> {
        self.lock()
            .expenses
            .iter()
            .filter(|e| e.expense_type == expense_type)
            .cloned()
            .collect()
    }

    /// Write a budget, then reload budgets only
    pub async fn save_budget(
        &self,
        draft: BudgetDraft,
        existing_id: Option<DocumentId>,
    ) -> TrackerResult<DocumentId> {
        self.track("save_budget", async move {
            let owner = self.require_user()?;
            let id = self
                .store
                .save_or_update(BUDGETS, &owner, draft.fields, existing_id)
                .await?;
            let budgets = decode_all(self.fetch_budget_documents(&owner).await?)?;
            self.update(|s| s.budgets = budgets);
            Ok(id)
        })
        .await
    }

    /// Delete one budget and drop it from the snapshot
    pub async fn delete_budget(&self, id: DocumentId) -> TrackerResult<()> {
        self.track("delete_budget", async move {
            let owner = self.acting_user()?;
            self.store.delete(BUDGETS, &owner, id).await?;
            self.update(|s| s.budgets.retain(|b| b.id != id));
            Ok(())
        })
        .await
    }

    /// Totals over the loaded data
    pub fn summary(&self) -> ExpenseSummary {
        let state = self.lock();
        ExpenseSummary::build(state.paycheck.as_ref(), &state.expenses, &state.budgets)
    }
}
