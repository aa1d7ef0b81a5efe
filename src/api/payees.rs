use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{NewPayee, Payee, PayeePatch};

/// Asks the server to re-run auto-categorisation over existing transactions.
fn rerun_rules() -> [(&'static str, String); 1] {
    [("updateTransactions", "true".to_string())]
}

pub async fn get_payees(client: &ApiClient) -> Result<Vec<Payee>, ApiError> {
    client.get_json("/payees", &[]).await
}

pub async fn create_payee(client: &ApiClient, data: &NewPayee) -> Result<Payee, ApiError> {
    client.post_json("/payees", &rerun_rules(), data).await
}

pub async fn update_payee(client: &ApiClient, id: Uuid, patch: &PayeePatch) -> Result<(), ApiError> {
    client
        .patch_json(&format!("/payees/{}", id), &rerun_rules(), patch)
        .await?;
    Ok(())
}

pub async fn delete_payee(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
    client.delete(&format!("/payees/{}", id)).await?;
    Ok(())
}
