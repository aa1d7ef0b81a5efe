use uuid::Uuid;

use super::{logged, Resource};
use crate::api::{payees, ApiClient};
use crate::error::ApiError;
use crate::models::{NewPayee, Payee, PayeePatch};

pub struct PayeesService;

impl Resource for PayeesService {
    type Entity = Payee;
    type New = NewPayee;

    const LABEL: &'static str = "payees";

    async fn fetch_all(client: &ApiClient) -> Result<Vec<Payee>, ApiError> {
        logged(payees::get_payees(client).await, "fetching payees")
    }

    async fn create(client: &ApiClient, data: &NewPayee) -> Result<Payee, ApiError> {
        logged(payees::create_payee(client, data).await, "creating payee")
    }

    async fn update(client: &ApiClient, id: Uuid, patch: &PayeePatch) -> Result<(), ApiError> {
        logged(payees::update_payee(client, id, patch).await, "updating payee")
    }

    async fn delete(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
        logged(payees::delete_payee(client, id).await, "deleting payee")
    }
}
