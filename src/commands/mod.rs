//! Form-level entry points. Input is checked against the loaded collections
//! before any request is made; everything else is delegated to the stores.

use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::Entity;

pub mod accounts;
pub mod budgets;
pub mod payees;
pub mod transactions;

/// Trim `value`, rejecting it if nothing is left.
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reject `name` when another entity in `existing` already uses it.
///
/// Names are compared exactly after trimming; `exclude` skips the entity being renamed.
pub(crate) fn ensure_unique_name<'a, T, I>(existing: I, name: &str, exclude: Option<Uuid>) -> Result<(), ValidationError>
where
    T: Entity + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let name = name.trim();
    let taken = existing
        .into_iter()
        .filter(|entity| Some(entity.id()) != exclude)
        .any(|entity| entity.name().trim() == name);

    if taken {
        return Err(ValidationError::DuplicateName(name.to_string()));
    }
    Ok(())
}
