use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Account, AccountPatch, NewAccount};

pub async fn get_accounts(client: &ApiClient) -> Result<Vec<Account>, ApiError> {
    client.get_json("/accounts", &[]).await
}

pub async fn get_account(client: &ApiClient, id: Uuid) -> Result<Account, ApiError> {
    client.get_json(&format!("/accounts/{}", id), &[]).await
}

pub async fn create_account(client: &ApiClient, data: &NewAccount) -> Result<Account, ApiError> {
    client.post_json("/accounts", &[], data).await
}

pub async fn update_account(client: &ApiClient, id: Uuid, patch: &AccountPatch) -> Result<(), ApiError> {
    client.patch_json(&format!("/accounts/{}", id), &[], patch).await?;
    Ok(())
}

pub async fn delete_account(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
    client.delete(&format!("/accounts/{}", id)).await?;
    Ok(())
}
