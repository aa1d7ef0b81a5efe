//! Resource services: one module per entity, each call wraps exactly one
//! endpoint, logs failures for developers and hands the error back unchanged.

use serde::Serialize;
use std::future::Future;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Entity;

pub mod accounts;
pub mod adapters;
pub mod budgets;
pub mod categories;
pub mod groups;
pub mod payees;
pub mod state;
pub mod transactions;

/// The list/create/update/delete quartet shared by the top-level collections.
///
/// Updates are acknowledged without a body; callers merge the patch they sent.
pub trait Resource: Send + Sync + 'static {
    type Entity: Entity;
    type New: Serialize + Clone + Send + Sync + 'static;

    /// Plural noun used in log lines, e.g. `"accounts"`.
    const LABEL: &'static str;

    fn fetch_all(client: &ApiClient) -> impl Future<Output = Result<Vec<Self::Entity>, ApiError>> + Send;

    fn create(
        client: &ApiClient,
        data: &Self::New,
    ) -> impl Future<Output = Result<Self::Entity, ApiError>> + Send;

    fn update(
        client: &ApiClient,
        id: Uuid,
        patch: &<Self::Entity as Entity>::Patch,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete(client: &ApiClient, id: Uuid) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Log a failed call and pass the result through untouched.
pub(crate) fn logged<T>(result: Result<T, ApiError>, action: &str) -> Result<T, ApiError> {
    if let Err(err) = &result {
        tracing::error!("error {}: {}", action, err);
    }
    result
}
