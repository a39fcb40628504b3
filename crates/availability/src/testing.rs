//! In-crate test doubles for the collaborator ports.
//!
//! Deliberately simpler than the `stocksense-infra` implementations; they
//! exist so engine modules can unit-test against controlled fixtures and
//! count collaborator calls.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, AvailabilityResult, ProductConcreteId, Quantity, Sku,
    Store, StoreId, StoreWarehouseMap,
};

use crate::ports::{
    AvailabilityStore, NotificationSink, ReservationLookup, StockLookup, StoreResolver,
};
use crate::types::{
    AbstractAvailability, AvailabilityCriteria, AvailabilityNotification, ConcreteAvailability,
};
use stocksense_core::AvailabilityError;

pub(crate) fn store_de() -> Store {
    Store::new(StoreId::new(1), "DE")
}

pub(crate) fn store_at() -> Store {
    Store::new(StoreId::new(2), "AT")
}

#[derive(Default)]
pub(crate) struct StubStock {
    stock: Mutex<HashMap<(Sku, StoreId), Quantity>>,
    never_out_of_stock: Mutex<HashSet<(Sku, StoreId)>>,
    variants: Mutex<HashMap<AbstractSku, Vec<Sku>>>,
    stores: Mutex<HashMap<StoreId, Store>>,
    pub lookups: AtomicUsize,
}

impl StubStock {
    pub fn set_stock(&self, sku: &Sku, store: &Store, quantity: Quantity) {
        self.stores
            .lock()
            .expect("lock")
            .insert(store.id, store.clone());
        self.stock
            .lock()
            .expect("lock")
            .insert((sku.clone(), store.id), quantity);
    }

    pub fn set_never_out_of_stock(&self, sku: &Sku, store: &Store) {
        self.never_out_of_stock
            .lock()
            .expect("lock")
            .insert((sku.clone(), store.id));
    }

    pub fn link_variant(&self, abstract_sku: &AbstractSku, sku: &Sku) {
        self.variants
            .lock()
            .expect("lock")
            .entry(abstract_sku.clone())
            .or_default()
            .push(sku.clone());
    }
}

impl StockLookup for StubStock {
    fn total_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .stock
            .lock()
            .expect("lock")
            .get(&(sku.clone(), store.id))
            .copied()
            .unwrap_or_default())
    }

    fn total_for_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Quantity> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let variants = self
            .variants
            .lock()
            .expect("lock")
            .get(abstract_sku)
            .cloned()
            .unwrap_or_default();
        let stock = self.stock.lock().expect("lock");
        Ok(variants
            .iter()
            .map(|sku| {
                stock
                    .get(&(sku.clone(), store.id))
                    .copied()
                    .unwrap_or_default()
            })
            .sum())
    }

    fn is_never_out_of_stock(&self, sku: &Sku, store: &Store) -> AvailabilityResult<bool> {
        Ok(self
            .never_out_of_stock
            .lock()
            .expect("lock")
            .contains(&(sku.clone(), store.id)))
    }

    fn stores_with_stock_defined(&self, sku: &Sku) -> AvailabilityResult<Vec<Store>> {
        let stores = self.stores.lock().expect("lock");
        let stock = self.stock.lock().expect("lock");
        let mut defined: Vec<Store> = stock
            .keys()
            .filter(|(stock_sku, _)| stock_sku == sku)
            .filter_map(|(_, store_id)| stores.get(store_id).cloned())
            .collect();
        defined.sort_by_key(|store| store.id);
        Ok(defined)
    }

    fn store_to_warehouse_mapping(&self) -> AvailabilityResult<StoreWarehouseMap> {
        Ok(StoreWarehouseMap::new())
    }
}

#[derive(Default)]
pub(crate) struct StubReservations {
    reserved: Mutex<HashMap<(Sku, StoreId), Quantity>>,
    pub lookups: AtomicUsize,
}

impl StubReservations {
    pub fn set_reserved(&self, sku: &Sku, store: &Store, quantity: Quantity) {
        self.reserved
            .lock()
            .expect("lock")
            .insert((sku.clone(), store.id), quantity);
    }
}

impl ReservationLookup for StubReservations {
    fn sum_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .reserved
            .lock()
            .expect("lock")
            .get(&(sku.clone(), store.id))
            .copied()
            .unwrap_or_default())
    }

    fn sum_for_skus(&self, skus: &[Sku], store: &Store) -> AvailabilityResult<Quantity> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let reserved = self.reserved.lock().expect("lock");
        Ok(skus
            .iter()
            .map(|sku| {
                reserved
                    .get(&(sku.clone(), store.id))
                    .copied()
                    .unwrap_or_default()
            })
            .sum())
    }
}

#[derive(Default)]
pub(crate) struct StubAvailabilityStore {
    products: Mutex<HashMap<Sku, AbstractSku>>,
    concrete_ids: Mutex<HashMap<ProductConcreteId, Sku>>,
    concrete: Mutex<HashMap<(Sku, StoreId), ConcreteAvailability>>,
    abstracts: Mutex<HashMap<(AbstractSku, StoreId), (AbstractAvailabilityId, Quantity)>>,
    next_abstract_id: AtomicU64,
}

impl StubAvailabilityStore {
    pub fn register_product(&self, id: ProductConcreteId, sku: &Sku, abstract_sku: &AbstractSku) {
        self.products
            .lock()
            .expect("lock")
            .insert(sku.clone(), abstract_sku.clone());
        self.concrete_ids
            .lock()
            .expect("lock")
            .insert(id, sku.clone());
    }
}

impl AvailabilityStore for StubAvailabilityStore {
    fn find_concrete(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<Option<ConcreteAvailability>> {
        Ok(self
            .concrete
            .lock()
            .expect("lock")
            .get(&(sku.clone(), store.id))
            .cloned())
    }

    fn find_concrete_batch(
        &self,
        skus: &[Sku],
        store: &Store,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>> {
        let concrete = self.concrete.lock().expect("lock");
        Ok(skus
            .iter()
            .filter_map(|sku| concrete.get(&(sku.clone(), store.id)).cloned())
            .collect())
    }

    fn find_concrete_by_criteria(
        &self,
        criteria: &AvailabilityCriteria,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>> {
        let concrete = self.concrete.lock().expect("lock");
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
            .lock()
            .expect("lock")
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
            .lock()
            .expect("lock")
            .get(&availability.sku)
            .cloned()
            .ok_or_else(|| {
                AvailabilityError::not_found(format!(
                    "no abstract product for concrete sku {}",
                    availability.sku
                ))
            })?;

        // Foreign-key invariant: the abstract parent row must exist first.
        if !self
            .abstracts
            .lock()
            .expect("lock")
            .contains_key(&(abstract_sku.clone(), availability.store_id))
        {
            return Err(AvailabilityError::not_found(format!(
                "no abstract availability row for {abstract_sku} in store {}",
                availability.store_id
            )));
        }

        let created = self
            .concrete
            .lock()
            .expect("lock")
            .insert(
                (availability.sku.clone(), availability.store_id),
                availability.clone(),
            )
            .is_none();
        Ok(created)
    }

    fn save_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
        quantity: Quantity,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let mut abstracts = self.abstracts.lock().expect("lock");
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
        Ok(self.products.lock().expect("lock").get(sku).cloned())
    }

    fn concrete_skus_of_abstract(
        &self,
        abstract_sku: &AbstractSku,
    ) -> AvailabilityResult<Vec<Sku>> {
        let products = self.products.lock().expect("lock");
        let mut skus: Vec<Sku> = products
            .iter()
            .filter(|(_, owner)| *owner == abstract_sku)
            .map(|(sku, _)| sku.clone())
            .collect();
        skus.sort();
        Ok(skus)
    }

    fn sku_of_product_concrete(&self, id: ProductConcreteId) -> AvailabilityResult<Option<Sku>> {
        Ok(self.concrete_ids.lock().expect("lock").get(&id).cloned())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    notifications: Mutex<Vec<AvailabilityNotification>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.notifications.lock().expect("lock").len()
    }

    pub fn recorded(&self) -> Vec<AvailabilityNotification> {
        self.notifications.lock().expect("lock").clone()
    }
}

impl NotificationSink for RecordingSink {
    fn abstract_availability_changed(&self, notification: AvailabilityNotification) {
        self.notifications.lock().expect("lock").push(notification);
    }
}

pub(crate) struct StubStores {
    pub current: Store,
    pub known: Vec<Store>,
}

impl StubStores {
    pub fn new(current: Store) -> Self {
        let known = vec![current.clone()];
        Self { current, known }
    }
}

impl StoreResolver for StubStores {
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
