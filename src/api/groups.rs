use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Group, GroupPatch, NewGroup};

pub async fn get_groups(client: &ApiClient) -> Result<Vec<Group>, ApiError> {
    client.get_json("/groups", &[]).await
}

pub async fn create_group(client: &ApiClient, data: &NewGroup) -> Result<Group, ApiError> {
    client.post_json("/groups", &[], data).await
}

pub async fn update_group(client: &ApiClient, id: Uuid, patch: &GroupPatch) -> Result<(), ApiError> {
    client.patch_json(&format!("/groups/{}", id), &[], patch).await?;
    Ok(())
}

pub async fn delete_group(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
    client.delete(&format!("/groups/{}", id)).await?;
    Ok(())
}
