use serde::Deserialize;
use uuid::Uuid;

use super::{ensure_unique_name, required};
use crate::error::StoreError;
use crate::models::{Account, AccountPatch, Entity, NewAccount};
use crate::services::state::AppState;
use crate::stores::Outcome;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub category: String,
    pub adapter: String,
    #[serde(default)]
    pub off_budget: bool,
}

pub async fn create_account(state: &AppState, form: AccountForm) -> Result<Account, StoreError> {
    let name = required(&form.name, "name")?;
    ensure_unique_name(&state.accounts.items(), &name, None)?;

    let data = NewAccount {
        name,
        category: required(&form.category, "category")?,
        adapter: required(&form.adapter, "adapter")?,
        off_budget: form.off_budget,
    };
    state.accounts.create(&data).await
}

/// Apply an edit to a loaded account.
///
/// Returns `Ok(None)` without contacting the server when the patch would not
/// change anything. Otherwise the whole account is sent, as the server
/// replaces every writable field.
pub async fn update_account(state: &AppState, id: Uuid, mut patch: AccountPatch) -> Result<Option<Outcome>, StoreError> {
    let account = state.accounts.find(id).ok_or(StoreError::UnknownEntity(id))?;

    if let Some(name) = &patch.name {
        let name = required(name, "name")?;
        ensure_unique_name(&state.accounts.items(), &name, Some(id))?;
        patch.name = Some(name);
    }
    if let Some(category) = &patch.category {
        patch.category = Some(required(category, "category")?);
    }
    if let Some(adapter) = &patch.adapter {
        patch.adapter = Some(required(adapter, "adapter")?);
    }

    if patch.is_noop_for(&account) {
        tracing::debug!("nothing to update for account {}", id);
        return Ok(None);
    }
    state.accounts.update(id, &account.full_patch(&patch)).await.map(Some)
}

pub async fn delete_account(state: &AppState, id: Uuid) -> Result<(), StoreError> {
    state.accounts.delete(id).await?;
    if state.transactions.account_id() == Some(id) {
        state.transactions.clear();
    }
    Ok(())
}
