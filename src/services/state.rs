use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::error::{StoreError, ValidationError};
use crate::services::accounts::AccountsService;
use crate::services::categories::CategoriesService;
use crate::services::groups::GroupsService;
use crate::services::payees::PayeesService;
use crate::stores::{AdaptersStore, BudgetsStore, Store, TransactionsStore};

/// Every store the client needs, built once from [`Settings`] and shared by reference.
///
/// All stores talk through the same [`ApiClient`], so they share one connection pool
/// and one set of credentials.
pub struct AppState {
    pub settings: Settings,
    pub client: ApiClient,
    pub accounts: Arc<Store<AccountsService>>,
    pub payees: Arc<Store<PayeesService>>,
    pub categories: Arc<Store<CategoriesService>>,
    pub groups: Arc<Store<GroupsService>>,
    pub transactions: Arc<TransactionsStore>,
    pub budgets: Arc<BudgetsStore>,
    pub adapters: Arc<AdaptersStore>,
}

impl AppState {
    pub fn init(settings: &Settings) -> Result<Self, StoreError> {
        if settings.page_size == 0 {
            return Err(ValidationError::InvalidPageSize.into());
        }
        let client = ApiClient::new(&settings.base_url, &settings.username, &settings.password)?;
        tracing::info!("vitta client ready for {}", client.base_url());

        Ok(AppState {
            accounts: Arc::new(Store::new(client.clone())),
            payees: Arc::new(Store::new(client.clone())),
            categories: Arc::new(Store::new(client.clone())),
            groups: Arc::new(Store::new(client.clone())),
            transactions: Arc::new(TransactionsStore::new(
                client.clone(),
                settings.page_size,
                settings.search_debounce(),
            )),
            budgets: Arc::new(BudgetsStore::new(client.clone())),
            adapters: Arc::new(AdaptersStore::new(client.clone())),
            settings: settings.clone(),
            client,
        })
    }

    /// Abort pending searches and forget everything loaded so far.
    pub fn dispose(&self) {
        self.transactions.clear();
        self.accounts.clear();
        self.payees.clear();
        self.categories.clear();
        self.groups.clear();
        self.budgets.clear();
        self.adapters.clear();
        tracing::debug!("client state disposed");
    }
}
