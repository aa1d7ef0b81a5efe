use super::ApiClient;
use crate::error::ApiError;
use crate::models::Adapter;

pub async fn get_adapters(client: &ApiClient) -> Result<Vec<Adapter>, ApiError> {
    client.get_json("/adapters", &[]).await
}
