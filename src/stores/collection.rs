use std::collections::HashMap;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Entity;

/// Whether a response was applied to the store or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request for the same data was issued before this one returned.
    Superseded,
}

/// A point-in-time copy of a store for readers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<StoreError>,
}

/// The state every store shares: items in display order, the loading flag,
/// the last error, and the guards that drop out-of-order responses.
#[derive(Debug)]
pub(crate) struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<StoreError>,
    fetch_generation: u64,
    next_sequence: u64,
    applied: HashMap<Uuid, u64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            items: Vec::new(),
            loading: false,
            error: None,
            fetch_generation: 0,
            next_sequence: 0,
            applied: HashMap::new(),
        }
    }
}

impl<T: Clone> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// Start a list request; any earlier request still in flight becomes stale.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.loading = true;
        self.fetch_generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.fetch_generation
    }

    /// Apply a list response. On failure the previous items stay visible.
    pub fn finish_fetch(&mut self, generation: u64, result: Result<Vec<T>, StoreError>) -> Result<Outcome, StoreError> {
        if !self.is_current(generation) {
            tracing::debug!(
                "dropping list response {} (latest is {})",
                generation,
                self.fetch_generation
            );
            return Ok(Outcome::Superseded);
        }

        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                Ok(Outcome::Applied)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Record a failure without touching the items.
    pub fn fail(&mut self, err: StoreError) -> StoreError {
        self.error = Some(err.clone());
        err
    }

    pub fn succeed(&mut self) {
        self.error = None;
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
        self.error = None;
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
        self.error = None;
    }

    /// Forget everything, including in-flight requests.
    pub fn reset(&mut self) {
        self.items.clear();
        self.loading = false;
        self.error = None;
        self.fetch_generation += 1;
        self.applied.clear();
    }
}

impl<T: Entity> Collection<T> {
    pub fn find(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Take a sequence number for a mutation of one entity.
    pub fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    /// Merge an acknowledged patch unless a later patch for the same entity
    /// has already been applied.
    pub fn apply_patch(&mut self, id: Uuid, sequence: u64, patch: &T::Patch) -> Outcome {
        if let Some(&last) = self.applied.get(&id) {
            if sequence < last {
                tracing::debug!("dropping stale patch {} for {} (applied {})", sequence, id, last);
                return Outcome::Superseded;
            }
        }

        self.applied.insert(id, sequence);
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.merge(patch);
        }
        self.error = None;
        Outcome::Applied
    }

    /// Replace an entity with a fresh server copy, appending it if unknown.
    pub fn replace(&mut self, entity: T) {
        match self.items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(item) => *item = entity,
            None => self.items.push(entity),
        }
        self.error = None;
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.applied.remove(&id);
        self.error = None;
        self.items.len() != before
    }
}
