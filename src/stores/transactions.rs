use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use super::collection::{Collection, Outcome};
use super::debounce::Debouncer;
use super::pagination::Pagination;
use crate::api::transactions::{ImportFile, TransactionQuery};
use crate::api::ApiClient;
use crate::error::StoreError;
use crate::models::{Entity, ImportResult, NewTransaction, Transaction, TransactionPatch};
use crate::services::transactions::TransactionsService;

/// Everything a view needs to render one page of an account's transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsSnapshot {
    pub account_id: Option<Uuid>,
    pub items: Vec<Transaction>,
    pub loading: bool,
    pub error: Option<StoreError>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub search_query: String,
}

#[derive(Debug)]
struct TransactionsState {
    collection: Collection<Transaction>,
    account_id: Option<Uuid>,
    pagination: Pagination,
    search_query: String,
}

impl TransactionsState {
    fn query(&self) -> TransactionQuery {
        TransactionQuery {
            search: self.search_query.clone(),
            page: self.pagination.page(),
            limit: self.pagination.limit(),
        }
    }
}

/// The selected account's transactions: one page at a time, filtered by a
/// search query.
///
/// Changing the page or the query does not fetch by itself; callers follow up
/// with [`TransactionsStore::refresh`], or use [`TransactionsStore::search`]
/// which schedules a debounced refresh.
pub struct TransactionsStore {
    client: ApiClient,
    state: Mutex<TransactionsState>,
    debouncer: Debouncer,
}

impl TransactionsStore {
    pub fn new(client: ApiClient, page_size: u64, search_debounce: Duration) -> Self {
        TransactionsStore {
            client,
            state: Mutex::new(TransactionsState {
                collection: Collection::default(),
                account_id: None,
                pagination: Pagination::new(page_size),
                search_query: String::new(),
            }),
            debouncer: Debouncer::new(search_debounce),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TransactionsState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Lock)
    }

    fn selected_account(&self) -> Result<Uuid, StoreError> {
        self.lock()?.account_id.ok_or(StoreError::NoAccountSelected)
    }

    /// Record a failed write, unless another account was selected while it ran.
    fn fail(&self, account_id: Uuid, err: StoreError) -> StoreError {
        match self.lock() {
            Ok(mut state) if state.account_id == Some(account_id) => state.collection.fail(err),
            _ => err,
        }
    }

    pub fn snapshot(&self) -> Result<TransactionsSnapshot, StoreError> {
        let state = self.lock()?;
        Ok(TransactionsSnapshot {
            account_id: state.account_id,
            items: state.collection.items().to_vec(),
            loading: state.collection.loading(),
            error: state.collection.error().cloned(),
            page: state.pagination.page(),
            limit: state.pagination.limit(),
            total: state.pagination.total(),
            total_pages: state.pagination.total_pages(),
            has_next_page: state.pagination.has_next_page(),
            search_query: state.search_query.clone(),
        })
    }

    pub fn account_id(&self) -> Option<Uuid> {
        self.lock().ok().and_then(|state| state.account_id)
    }

    pub fn items(&self) -> Vec<Transaction> {
        self.lock()
            .map(|state| state.collection.items().to_vec())
            .unwrap_or_default()
    }

    pub fn find(&self, id: Uuid) -> Option<Transaction> {
        self.lock()
            .ok()
            .and_then(|state| state.collection.find(id).cloned())
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.lock().ok().map(|state| state.pagination)
    }

    pub fn search_query(&self) -> String {
        self.lock()
            .map(|state| state.search_query.clone())
            .unwrap_or_default()
    }

    /// Load the current page for `account_id`, selecting it first.
    ///
    /// Switching accounts clears the previous account's rows and returns to page 1.
    pub async fn get(&self, account_id: Uuid) -> Result<Outcome, StoreError> {
        let (generation, query) = {
            let mut state = self.lock()?;
            if state.account_id != Some(account_id) {
                state.collection.reset();
                state.pagination.reset();
                state.pagination.set_total(0);
                state.account_id = Some(account_id);
            }
            (state.collection.begin_fetch(), state.query())
        };
        self.fetch(account_id, generation, query).await
    }

    /// Reload the current page of the selected account.
    pub async fn refresh(&self) -> Result<Outcome, StoreError> {
        let (account_id, generation, query) = {
            let mut state = self.lock()?;
            let account_id = state.account_id.ok_or(StoreError::NoAccountSelected)?;
            (account_id, state.collection.begin_fetch(), state.query())
        };
        self.fetch(account_id, generation, query).await
    }

    async fn fetch(&self, account_id: Uuid, generation: u64, query: TransactionQuery) -> Result<Outcome, StoreError> {
        let result = TransactionsService::fetch_page(&self.client, account_id, &query).await;

        let mut state = self.lock()?;
        match result {
            Ok(page) => {
                let outcome = state.collection.finish_fetch(generation, Ok(page.transactions))?;
                if outcome == Outcome::Applied {
                    state.pagination.set_total(page.total);
                }
                Ok(outcome)
            }
            Err(err) => state.collection.finish_fetch(generation, Err(err.into())),
        }
    }

    /// Set the search filter. A changed filter always goes back to page 1.
    pub fn set_search_query(&self, query: &str) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.search_query == query {
            return Ok(false);
        }
        state.search_query = query.to_string();
        state.pagination.reset();
        Ok(true)
    }

    /// Set the search filter and refresh once typing pauses.
    pub fn search(self: &Arc<Self>, query: &str) -> Result<bool, StoreError> {
        let changed = self.set_search_query(query)?;
        if changed {
            let store = Arc::clone(self);
            self.debouncer.schedule(async move {
                if let Err(err) = store.refresh().await {
                    tracing::warn!("search refresh failed: {}", err);
                }
            });
        }
        Ok(changed)
    }

    pub fn go_to_next_page(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.pagination.next())
    }

    pub fn go_to_previous_page(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.pagination.previous())
    }

    pub async fn create(&self, data: &NewTransaction) -> Result<Transaction, StoreError> {
        let account_id = self.selected_account()?;
        match TransactionsService::create(&self.client, account_id, data).await {
            Ok(transaction) => {
                let mut state = self.lock()?;
                if state.account_id == Some(account_id) {
                    state.collection.append(transaction.clone());
                }
                Ok(transaction)
            }
            Err(err) => Err(self.fail(account_id, err.into())),
        }
    }

    pub async fn update(&self, id: Uuid, patch: &TransactionPatch) -> Result<Outcome, StoreError> {
        let (account_id, sequence) = {
            let mut state = self.lock()?;
            let account_id = state.account_id.ok_or(StoreError::NoAccountSelected)?;
            (account_id, state.collection.next_sequence())
        };

        match TransactionsService::update(&self.client, account_id, id, patch).await {
            Ok(()) => {
                let mut state = self.lock()?;
                if state.account_id != Some(account_id) {
                    return Ok(Outcome::Superseded);
                }
                Ok(state.collection.apply_patch(id, sequence, patch))
            }
            Err(err) => Err(self.fail(account_id, err.into())),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let account_id = self.selected_account()?;
        match TransactionsService::delete(&self.client, account_id, id).await {
            Ok(()) => {
                let mut state = self.lock()?;
                if state.account_id == Some(account_id) {
                    state.collection.remove(id);
                }
                Ok(())
            }
            Err(err) => Err(self.fail(account_id, err.into())),
        }
    }

    /// Mark a loaded transaction cleared now, or uncleared if it already was.
    ///
    /// The whole row is sent since the server overwrites every writable column.
    pub async fn toggle_cleared(&self, id: Uuid) -> Result<Outcome, StoreError> {
        let transaction = self.find(id).ok_or(StoreError::UnknownEntity(id))?;

        let edit = TransactionPatch {
            cleared_at: Some(if transaction.is_cleared() { None } else { Some(Utc::now()) }),
            ..Default::default()
        };
        self.update(id, &transaction.full_patch(&edit)).await
    }

    /// Upload a bank export for the selected account.
    ///
    /// Rows the server echoes back are appended; when it only reports counters
    /// the collection is left alone and the caller should refresh.
    pub async fn import(&self, file: ImportFile, adapter: Option<&str>) -> Result<ImportResult, StoreError> {
        let account_id = self.selected_account()?;
        match TransactionsService::import(&self.client, account_id, file, adapter).await {
            Ok(result) => {
                let mut state = self.lock()?;
                if state.account_id == Some(account_id) {
                    state.collection.extend(result.created.iter().cloned());
                }
                Ok(result)
            }
            Err(err) => Err(self.fail(account_id, err.into())),
        }
    }

    /// Drop the selection, rows and any pending search.
    pub fn clear(&self) {
        self.debouncer.cancel();
        if let Ok(mut state) = self.lock() {
            state.collection.reset();
            state.account_id = None;
            state.pagination.reset();
            state.pagination.set_total(0);
            state.search_query.clear();
        }
    }
}
