//! Groups, categories and monthly allocations.

use uuid::Uuid;

use super::{ensure_unique_name, optional, required};
use crate::error::{StoreError, ValidationError};
use crate::models::{Budget, Category, CategoryPatch, Entity, Group, GroupPatch, NewCategory, NewGroup, SetBudget};
use crate::services::state::AppState;
use crate::stores::Outcome;
use crate::utils::parse_amount;

pub async fn create_group(state: &AppState, name: &str, notes: Option<&str>) -> Result<Group, StoreError> {
    let name = required(name, "name")?;
    ensure_unique_name(&state.groups.items(), &name, None)?;

    let data = NewGroup {
        name,
        notes: optional(notes),
    };
    state.groups.create(&data).await
}

pub async fn update_group(state: &AppState, id: Uuid, mut patch: GroupPatch) -> Result<Outcome, StoreError> {
    let group = state.groups.find(id).ok_or(StoreError::UnknownEntity(id))?;
    if let Some(name) = &patch.name {
        let name = required(name, "name")?;
        ensure_unique_name(&state.groups.items(), &name, Some(id))?;
        patch.name = Some(name);
    }
    state.groups.update(id, &group.full_patch(&patch)).await
}

pub async fn delete_group(state: &AppState, id: Uuid) -> Result<(), StoreError> {
    state.groups.delete(id).await
}

fn categories_in(state: &AppState, group_id: Uuid) -> Vec<Category> {
    state
        .categories
        .items()
        .into_iter()
        .filter(|category| category.group_id == group_id)
        .collect()
}

/// Category names only need to be unique within their group.
pub async fn create_category(
    state: &AppState,
    group_id: Uuid,
    name: &str,
    notes: Option<&str>,
) -> Result<Category, StoreError> {
    let name = required(name, "name")?;
    ensure_unique_name(&categories_in(state, group_id), &name, None)?;

    let data = NewCategory {
        group_id,
        name,
        notes: optional(notes),
    };
    state.categories.create(&data).await
}

pub async fn update_category(state: &AppState, id: Uuid, mut patch: CategoryPatch) -> Result<Outcome, StoreError> {
    let category = state.categories.find(id).ok_or(StoreError::UnknownEntity(id))?;
    let group_id = patch.group_id.unwrap_or(category.group_id);

    let name = match &patch.name {
        Some(name) => required(name, "name")?,
        None => category.name.clone(),
    };
    if patch.name.is_some() || group_id != category.group_id {
        ensure_unique_name(&categories_in(state, group_id), &name, Some(id))?;
    }
    if patch.name.is_some() {
        patch.name = Some(name);
    }
    state.categories.update(id, &category.full_patch(&patch)).await
}

pub async fn delete_category(state: &AppState, id: Uuid) -> Result<(), StoreError> {
    state.categories.delete(id).await
}

/// Set `category_id`'s allocation for the month from a typed amount.
pub async fn set_budget(
    state: &AppState,
    category_id: Uuid,
    year: u16,
    month: u8,
    amount: &str,
) -> Result<Budget, StoreError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidPeriod { year, month }.into());
    }
    let amount = required(amount, "amount")?;

    let data = SetBudget {
        category_id,
        year,
        month,
        budgeted: parse_amount(&amount)?,
    };
    state.budgets.create(&data).await
}
