//! In-memory availability cache persistence.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use stocksense_availability::{
    AbstractAvailability, AvailabilityCriteria, AvailabilityStore, ConcreteAvailability,
};
use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, AvailabilityError, AvailabilityResult, ProductConcreteId,
    Quantity, Sku, Store, StoreId,
};

use crate::poisoned;

/// Cached availability rows plus the product catalog mappings the engine
/// resolves against.
///
/// Enforces the parent/child relation of the cache: a concrete row can only
/// be saved once the abstract row for its product family and store exists.
#[derive(Default)]
pub struct InMemoryAvailabilityStore {
    products: RwLock<HashMap<Sku, AbstractSku>>,
    concrete_ids: RwLock<HashMap<ProductConcreteId, Sku>>,
    concrete: RwLock<HashMap<(Sku, StoreId), ConcreteAvailability>>,
    abstracts: RwLock<HashMap<(AbstractSku, StoreId), (AbstractAvailabilityId, Quantity)>>,
    next_abstract_id: AtomicU64,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a concrete product and the abstract product owning it.
    pub fn register_product(
        &self,
        id: ProductConcreteId,
        sku: &Sku,
        abstract_sku: &AbstractSku,
    ) -> AvailabilityResult<()> {
        self.products
            .write()
            .map_err(|_| poisoned("products"))?
            .insert(sku.clone(), abstract_sku.clone());
        self.concrete_ids
            .write()
            .map_err(|_| poisoned("concrete_ids"))?
            .insert(id, sku.clone());
        Ok(())
    }
}

impl AvailabilityStore for InMemoryAvailabilityStore {
    fn find_concrete(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<Option<ConcreteAvailability>> {
        Ok(self
            .concrete
            .read()
            .map_err(|_| poisoned("concrete"))?
            .get(&(sku.clone(), store.id))
            .cloned())
    }

    fn find_concrete_batch(
        &self,
        skus: &[Sku],
        store: &Store,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>> {
        let concrete = self.concrete.read().map_err(|_| poisoned("concrete"))?;
        Ok(skus
            .iter()
            .filter_map(|sku| concrete.get(&(sku.clone(), store.id)).cloned())
            .collect())
    }

    fn find_concrete_by_criteria(
        &self,
        criteria: &AvailabilityCriteria,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>> {
        let concrete = self.concrete.read().map_err(|_| poisoned("concrete"))?;
        let mut rows: Vec<ConcreteAvailability> = concrete
            .values()
            .filter(|row| criteria.matches(&row.sku, row.store_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.sku, a.store_id).cmp(&(&b.sku, b.store_id)));
        Ok(rows)
    }

    fn find_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Option<AbstractAvailability>> {
        Ok(self
            .abstracts
            .read()
            .map_err(|_| poisoned("abstracts"))?
            .get(&(abstract_sku.clone(), store.id))
            .map(|(_, quantity)| AbstractAvailability {
                abstract_sku: abstract_sku.clone(),
                store_id: store.id,
                availability: *quantity,
            }))
    }

    fn save_concrete(&self, availability: &ConcreteAvailability) -> AvailabilityResult<bool> {
        let abstract_sku = self
            .products
            .read()
            .map_err(|_| poisoned("products"))?
            .get(&availability.sku)
            .cloned()
            .ok_or_else(|| {
                AvailabilityError::not_found(format!(
                    "no abstract product for concrete sku {}",
                    availability.sku
                ))
            })?;

        // Parent row must exist before the child row.
        if !self
            .abstracts
            .read()
            .map_err(|_| poisoned("abstracts"))?
            .contains_key(&(abstract_sku.clone(), availability.store_id))
        {
            return Err(AvailabilityError::not_found(format!(
                "no abstract availability row for {abstract_sku} in store {}",
                availability.store_id
            )));
        }

        let created = self
            .concrete
            .write()
            .map_err(|_| poisoned("concrete"))?
            .insert(
                (availability.sku.clone(), availability.store_id),
                availability.clone(),
            )
            .is_none();

        debug!(
            sku = %availability.sku,
            store_id = %availability.store_id,
            availability = %availability.availability,
            created,
            "saved concrete availability"
        );
        Ok(created)
    }

    fn save_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
        quantity: Quantity,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let mut abstracts = self.abstracts.write().map_err(|_| poisoned("abstracts"))?;
        let entry = abstracts
            .entry((abstract_sku.clone(), store.id))
            .or_insert_with(|| {
                let id = self.next_abstract_id.fetch_add(1, Ordering::Relaxed) + 1;
                (AbstractAvailabilityId::new(id), quantity)
            });
        entry.1 = quantity;
        Ok(entry.0)
    }

    fn resolve_abstract_sku_of(&self, sku: &Sku) -> AvailabilityResult<Option<AbstractSku>> {
        Ok(self
            .products
            .read()
            .map_err(|_| poisoned("products"))?
            .get(sku)
            .cloned())
    }

    fn concrete_skus_of_abstract(
        &self,
        abstract_sku: &AbstractSku,
    ) -> AvailabilityResult<Vec<Sku>> {
        let products = self.products.read().map_err(|_| poisoned("products"))?;
        let mut skus: Vec<Sku> = products
            .iter()
            .filter(|(_, owner)| *owner == abstract_sku)
            .map(|(sku, _)| sku.clone())
            .collect();
        skus.sort();
        Ok(skus)
    }

    fn sku_of_product_concrete(&self, id: ProductConcreteId) -> AvailabilityResult<Option<Sku>> {
        Ok(self
            .concrete_ids
            .read()
            .map_err(|_| poisoned("concrete_ids"))?
            .get(&id)
            .cloned())
    }
}
