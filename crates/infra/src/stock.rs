//! In-memory stock subsystem.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use stocksense_availability::StockLookup;
use stocksense_core::{
    AbstractSku, AvailabilityResult, Quantity, Sku, Store, StoreId, StoreWarehouseMap,
};

use crate::poisoned;

/// Physical stock keyed by SKU, store and warehouse.
///
/// Stock is set per warehouse; totals sum across all warehouses of a store.
/// Setting stock registers the store and warehouse for the
/// store-to-warehouse mapping.
#[derive(Default)]
pub struct InMemoryStockLookup {
    quantities: RwLock<HashMap<(Sku, StoreId, String), Quantity>>,
    never_out_of_stock: RwLock<HashSet<(Sku, StoreId)>>,
    variants: RwLock<HashMap<AbstractSku, Vec<Sku>>>,
    stores: RwLock<HashMap<StoreId, Store>>,
    warehouses: RwLock<StoreWarehouseMap>,
}

impl InMemoryStockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(
        &self,
        sku: &Sku,
        store: &Store,
        warehouse: &str,
        quantity: Quantity,
    ) -> AvailabilityResult<()> {
        self.stores
            .write()
            .map_err(|_| poisoned("stores"))?
            .insert(store.id, store.clone());

        let mut warehouses = self.warehouses.write().map_err(|_| poisoned("warehouses"))?;
        let known = warehouses.entry(store.name.clone()).or_default();
        if !known.iter().any(|name| name == warehouse) {
            known.push(warehouse.to_string());
        }
        drop(warehouses);

        self.quantities
            .write()
            .map_err(|_| poisoned("quantities"))?
            .insert((sku.clone(), store.id, warehouse.to_string()), quantity);
        Ok(())
    }

    pub fn set_never_out_of_stock(&self, sku: &Sku, store: &Store) -> AvailabilityResult<()> {
        self.never_out_of_stock
            .write()
            .map_err(|_| poisoned("never_out_of_stock"))?
            .insert((sku.clone(), store.id));
        Ok(())
    }

    /// Registers a concrete SKU as a variant of an abstract product.
    pub fn link_variant(&self, abstract_sku: &AbstractSku, sku: &Sku) -> AvailabilityResult<()> {
        let mut variants = self.variants.write().map_err(|_| poisoned("variants"))?;
        let skus = variants.entry(abstract_sku.clone()).or_default();
        if !skus.contains(sku) {
            skus.push(sku.clone());
        }
        Ok(())
    }
}

impl StockLookup for InMemoryStockLookup {
    fn total_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity> {
        let quantities = self.quantities.read().map_err(|_| poisoned("quantities"))?;
        Ok(quantities
            .iter()
            .filter(|((row_sku, store_id, _), _)| row_sku == sku && *store_id == store.id)
            .map(|(_, quantity)| *quantity)
            .sum())
    }

    fn total_for_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Quantity> {
        let variants = self
            .variants
            .read()
            .map_err(|_| poisoned("variants"))?
            .get(abstract_sku)
            .cloned()
            .unwrap_or_default();

        let mut total = Quantity::ZERO;
        for sku in &variants {
            total = total.add(self.total_for_sku(sku, store)?);
        }
        Ok(total)
    }

    fn is_never_out_of_stock(&self, sku: &Sku, store: &Store) -> AvailabilityResult<bool> {
        Ok(self
            .never_out_of_stock
            .read()
            .map_err(|_| poisoned("never_out_of_stock"))?
            .contains(&(sku.clone(), store.id)))
    }

    fn stores_with_stock_defined(&self, sku: &Sku) -> AvailabilityResult<Vec<Store>> {
        let quantities = self.quantities.read().map_err(|_| poisoned("quantities"))?;
        let stores = self.stores.read().map_err(|_| poisoned("stores"))?;

        let ids: HashSet<StoreId> = quantities
            .keys()
            .filter(|(row_sku, _, _)| row_sku == sku)
            .map(|(_, store_id, _)| *store_id)
            .collect();

        let mut defined: Vec<Store> = ids.iter().filter_map(|id| stores.get(id).cloned()).collect();
        defined.sort_by_key(|store| store.id);
        Ok(defined)
    }

    fn store_to_warehouse_mapping(&self) -> AvailabilityResult<StoreWarehouseMap> {
        Ok(self
            .warehouses
            .read()
            .map_err(|_| poisoned("warehouses"))?
            .clone())
    }
}
