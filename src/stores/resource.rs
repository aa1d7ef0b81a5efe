use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::collection::{Collection, Outcome, Snapshot};
use crate::api::ApiClient;
use crate::error::StoreError;
use crate::models::{Account, Entity};
use crate::services::accounts::AccountsService;
use crate::services::Resource;

/// Client-side copy of one top-level collection (accounts, payees, groups, categories).
///
/// Writes go through the service first; local state is reconciled only once the
/// server has accepted them. The lock is never held across a request.
pub struct Store<R: Resource> {
    client: ApiClient,
    state: Mutex<Collection<R::Entity>>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Store<R> {
    pub fn new(client: ApiClient) -> Self {
        Store {
            client,
            state: Mutex::new(Collection::default()),
            _resource: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection<R::Entity>>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Lock)
    }

    pub fn snapshot(&self) -> Snapshot<R::Entity> {
        match self.lock() {
            Ok(state) => state.snapshot(),
            Err(err) => Snapshot {
                items: Vec::new(),
                loading: false,
                error: Some(err),
            },
        }
    }

    pub fn items(&self) -> Vec<R::Entity> {
        self.lock().map(|state| state.items().to_vec()).unwrap_or_default()
    }

    pub fn find(&self, id: Uuid) -> Option<R::Entity> {
        self.lock().ok().and_then(|state| state.find(id).cloned())
    }

    pub fn loading(&self) -> bool {
        self.lock().map(|state| state.loading()).unwrap_or(false)
    }

    pub fn error(&self) -> Option<StoreError> {
        self.lock().ok().and_then(|state| state.error().cloned())
    }

    /// Reload the whole collection.
    pub async fn get(&self) -> Result<Outcome, StoreError> {
        let generation = self.lock()?.begin_fetch();
        let result = R::fetch_all(&self.client).await.map_err(StoreError::from);
        let outcome = self.lock()?.finish_fetch(generation, result);
        if let Ok(Outcome::Applied) = outcome {
            tracing::debug!("loaded {}", R::LABEL);
        }
        outcome
    }

    /// Create on the server and append the returned entity.
    pub async fn create(&self, data: &R::New) -> Result<R::Entity, StoreError> {
        match R::create(&self.client, data).await {
            Ok(entity) => {
                self.lock()?.append(entity.clone());
                Ok(entity)
            }
            Err(err) => Err(self.lock()?.fail(err.into())),
        }
    }

    /// Patch on the server, then shallow-merge the submitted patch locally.
    pub async fn update(&self, id: Uuid, patch: &<R::Entity as Entity>::Patch) -> Result<Outcome, StoreError> {
        let sequence = self.lock()?.next_sequence();
        match R::update(&self.client, id, patch).await {
            Ok(()) => Ok(self.lock()?.apply_patch(id, sequence, patch)),
            Err(err) => Err(self.lock()?.fail(err.into())),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        match R::delete(&self.client, id).await {
            Ok(()) => {
                self.lock()?.remove(id);
                Ok(())
            }
            Err(err) => Err(self.lock()?.fail(err.into())),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            state.reset();
        }
    }
}

impl Store<AccountsService> {
    /// Re-read one account, picking up server-computed fields such as the balance.
    pub async fn refresh_one(&self, id: Uuid) -> Result<Account, StoreError> {
        match AccountsService::fetch_one(&self.client, id).await {
            Ok(account) => {
                self.lock()?.replace(account.clone());
                Ok(account)
            }
            Err(err) => Err(self.lock()?.fail(err.into())),
        }
    }
}
