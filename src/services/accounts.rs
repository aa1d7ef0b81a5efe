use uuid::Uuid;

use super::{logged, Resource};
use crate::api::{accounts, ApiClient};
use crate::error::ApiError;
use crate::models::{Account, AccountPatch, NewAccount};

pub struct AccountsService;

impl AccountsService {
    pub async fn fetch_one(client: &ApiClient, id: Uuid) -> Result<Account, ApiError> {
        logged(accounts::get_account(client, id).await, "fetching account")
    }
}

impl Resource for AccountsService {
    type Entity = Account;
    type New = NewAccount;

    const LABEL: &'static str = "accounts";

    async fn fetch_all(client: &ApiClient) -> Result<Vec<Account>, ApiError> {
        logged(accounts::get_accounts(client).await, "fetching accounts")
    }

    async fn create(client: &ApiClient, data: &NewAccount) -> Result<Account, ApiError> {
        logged(accounts::create_account(client, data).await, "creating account")
    }

    async fn update(client: &ApiClient, id: Uuid, patch: &AccountPatch) -> Result<(), ApiError> {
        logged(accounts::update_account(client, id, patch).await, "updating account")
    }

    async fn delete(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
        logged(accounts::delete_account(client, id).await, "deleting account")
    }
}
