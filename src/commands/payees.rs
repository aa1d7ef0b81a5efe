use uuid::Uuid;

use super::{ensure_unique_name, required};
use crate::error::StoreError;
use crate::models::{Entity, NewPayee, Payee, PayeePatch, PayeeRules};
use crate::services::state::AppState;
use crate::stores::Outcome;

pub async fn create_payee(state: &AppState, name: &str, auto_category_id: Option<Uuid>) -> Result<Payee, StoreError> {
    let name = required(name, "name")?;
    ensure_unique_name(&state.payees.items(), &name, None)?;

    let data = NewPayee {
        name,
        auto_category_id,
        rules: None,
    };
    state.payees.create(&data).await
}

/// Send `edit` as the payee's complete row so rules and auto-category survive.
async fn update_payee(state: &AppState, id: Uuid, edit: PayeePatch) -> Result<Outcome, StoreError> {
    let payee = state.payees.find(id).ok_or(StoreError::UnknownEntity(id))?;
    state.payees.update(id, &payee.full_patch(&edit)).await
}

pub async fn rename_payee(state: &AppState, id: Uuid, name: &str) -> Result<Outcome, StoreError> {
    let name = required(name, "name")?;
    ensure_unique_name(&state.payees.items(), &name, Some(id))?;

    let edit = PayeePatch {
        name: Some(name),
        ..Default::default()
    };
    update_payee(state, id, edit).await
}

/// Replace the matching rules. Blank patterns are dropped.
pub async fn set_payee_rules(state: &AppState, id: Uuid, rules: PayeeRules) -> Result<Outcome, StoreError> {
    let clean = |patterns: Vec<String>| -> Vec<String> {
        patterns
            .into_iter()
            .map(|pattern| pattern.trim().to_string())
            .filter(|pattern| !pattern.is_empty())
            .collect()
    };

    let edit = PayeePatch {
        rules: Some(PayeeRules {
            includes: clean(rules.includes),
            excludes: clean(rules.excludes),
            starts_with: clean(rules.starts_with),
            ends_with: clean(rules.ends_with),
        }),
        ..Default::default()
    };
    update_payee(state, id, edit).await
}

pub async fn set_auto_category(state: &AppState, id: Uuid, category_id: Option<Uuid>) -> Result<Outcome, StoreError> {
    let edit = PayeePatch {
        auto_category_id: Some(category_id),
        ..Default::default()
    };
    update_payee(state, id, edit).await
}

pub async fn delete_payee(state: &AppState, id: Uuid) -> Result<(), StoreError> {
    state.payees.delete(id).await
}
