use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

use super::{optional, required};
use crate::api::transactions::ImportFile;
use crate::error::{StoreError, ValidationError};
use crate::models::{ImportResult, NewTransaction, Transaction};
use crate::services::state::AppState;
use crate::stores::Outcome;
use crate::utils::{is_importable_file, parse_amount};

/// A transaction as typed into the add form. Amounts arrive as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    pub name: String,
    pub payee_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub credit: String,
    pub debit: String,
    pub notes: Option<String>,
}

pub async fn add_transaction(state: &AppState, form: TransactionForm) -> Result<Transaction, StoreError> {
    let name = required(&form.name, "name")?;
    let credit = parse_amount(&required(&form.credit, "credit")?)?;
    let debit = parse_amount(&required(&form.debit, "debit")?)?;

    let data = NewTransaction {
        name,
        payee_id: form.payee_id,
        category_id: form.category_id,
        credit,
        debit,
        notes: optional(form.notes.as_deref()),
    };
    state.transactions.create(&data).await
}

/// Upload a bank export into the selected account using that account's adapter.
///
/// When the server only reports counters the current page is reloaded so the
/// imported rows show up.
pub async fn import_file(state: &AppState, path: &Path) -> Result<ImportResult, StoreError> {
    if !is_importable_file(path) {
        return Err(ValidationError::UnsupportedFile(path.display().to_string()).into());
    }
    let account_id = state.transactions.account_id().ok_or(StoreError::NoAccountSelected)?;
    let adapter = state
        .accounts
        .find(account_id)
        .map(|account| account.adapter)
        .filter(|adapter| !adapter.is_empty());

    let file = ImportFile::read(path).await?;
    let result = state.transactions.import(file, adapter.as_deref()).await?;

    if result.created.is_empty() && result.imported_count > 0 {
        state.transactions.refresh().await?;
    }
    Ok(result)
}

/// Page forward from the current page until `id` is loaded.
pub async fn locate(state: &AppState, id: Uuid) -> Result<Transaction, StoreError> {
    loop {
        if let Some(transaction) = state.transactions.find(id) {
            return Ok(transaction);
        }
        if !next_page(state).await? {
            return Err(StoreError::UnknownEntity(id));
        }
    }
}

/// Flip the cleared flag, paging forward first if the row is not on the current page.
pub async fn toggle_cleared(state: &AppState, id: Uuid) -> Result<Outcome, StoreError> {
    locate(state, id).await?;
    state.transactions.toggle_cleared(id).await
}

pub async fn delete_transaction(state: &AppState, id: Uuid) -> Result<(), StoreError> {
    state.transactions.delete(id).await
}

/// Update the search box; the list refreshes once typing pauses.
pub fn search_transactions(state: &AppState, query: &str) -> Result<bool, StoreError> {
    state.transactions.search(query)
}

/// Move to the next page and load it. Returns `false` on the last page.
pub async fn next_page(state: &AppState) -> Result<bool, StoreError> {
    if !state.transactions.go_to_next_page()? {
        return Ok(false);
    }
    state.transactions.refresh().await?;
    Ok(true)
}

pub async fn previous_page(state: &AppState) -> Result<bool, StoreError> {
    if !state.transactions.go_to_previous_page()? {
        return Ok(false);
    }
    state.transactions.refresh().await?;
    Ok(true)
}
