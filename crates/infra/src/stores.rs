//! Store context resolution.

use stocksense_availability::StoreResolver;
use stocksense_core::{AvailabilityError, AvailabilityResult, Store};

/// Resolver with a fixed current store and a static set of known stores.
pub struct FixedStoreResolver {
    current: Store,
    known: Vec<Store>,
}

impl FixedStoreResolver {
    pub fn new(current: Store) -> Self {
        let known = vec![current.clone()];
        Self { current, known }
    }

    pub fn with_store(mut self, store: Store) -> Self {
        if !self.known.iter().any(|known| known.id == store.id) {
            self.known.push(store);
        }
        self
    }
}

impl StoreResolver for FixedStoreResolver {
    fn current_store(&self) -> AvailabilityResult<Store> {
        Ok(self.current.clone())
    }

    fn store_by_name(&self, name: &str) -> AvailabilityResult<Store> {
        self.known
            .iter()
            .find(|store| store.name == name)
            .cloned()
            .ok_or_else(|| AvailabilityError::not_found(format!("no store named {name}")))
    }
}
