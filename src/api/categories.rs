use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Category, CategoryPatch, NewCategory};

pub async fn get_categories(client: &ApiClient) -> Result<Vec<Category>, ApiError> {
    client.get_json("/categories", &[]).await
}

pub async fn create_category(client: &ApiClient, data: &NewCategory) -> Result<Category, ApiError> {
    client.post_json("/categories", &[], data).await
}

pub async fn update_category(client: &ApiClient, id: Uuid, patch: &CategoryPatch) -> Result<(), ApiError> {
    client.patch_json(&format!("/categories/{}", id), &[], patch).await?;
    Ok(())
}

pub async fn delete_category(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
    client.delete(&format!("/categories/{}", id)).await?;
    Ok(())
}
