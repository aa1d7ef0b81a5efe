use super::logged;
use crate::api::{adapters, ApiClient};
use crate::error::ApiError;
use crate::models::Adapter;

pub struct AdaptersService;

impl AdaptersService {
    pub async fn fetch_all(client: &ApiClient) -> Result<Vec<Adapter>, ApiError> {
        logged(adapters::get_adapters(client).await, "fetching adapters")
    }
}
