use std::sync::{Mutex, MutexGuard};

use super::collection::{Collection, Outcome, Snapshot};
use crate::api::ApiClient;
use crate::error::StoreError;
use crate::models::Adapter;
use crate::services::adapters::AdaptersService;

/// Read-only list of supported bank formats, used to fill account forms.
pub struct AdaptersStore {
    client: ApiClient,
    state: Mutex<Collection<Adapter>>,
}

impl AdaptersStore {
    pub fn new(client: ApiClient) -> Self {
        AdaptersStore {
            client,
            state: Mutex::new(Collection::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection<Adapter>>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Lock)
    }

    pub fn snapshot(&self) -> Snapshot<Adapter> {
        match self.lock() {
            Ok(state) => state.snapshot(),
            Err(err) => Snapshot {
                items: Vec::new(),
                loading: false,
                error: Some(err),
            },
        }
    }

    pub fn items(&self) -> Vec<Adapter> {
        self.lock().map(|state| state.items().to_vec()).unwrap_or_default()
    }

    pub async fn get(&self) -> Result<Outcome, StoreError> {
        let generation = self.lock()?.begin_fetch();
        let result = AdaptersService::fetch_all(&self.client)
            .await
            .map_err(StoreError::from);
        self.lock()?.finish_fetch(generation, result)
    }

    /// Distinct adapter names, in server order.
    pub fn names(&self) -> Vec<String> {
        distinct(self.items().into_iter().map(|adapter| adapter.name))
    }

    /// Distinct account categories, in server order.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.items().into_iter().map(|adapter| adapter.category))
    }

    /// Whether the server can import `category` statements with `name`.
    pub fn supports(&self, name: &str, category: &str) -> bool {
        self.items()
            .iter()
            .any(|adapter| adapter.name == name && adapter.category == category)
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            state.reset();
        }
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::distinct;

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let values = ["icici", "hdfc", "icici", "sbi", "hdfc"].map(String::from);

        assert_eq!(distinct(values.into_iter()), vec!["icici", "hdfc", "sbi"]);
    }
}
