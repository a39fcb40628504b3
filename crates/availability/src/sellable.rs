//! Sellability decisions against the availability cache.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use stocksense_core::{
    AvailabilityError, AvailabilityResult, ProductConcreteId, Quantity, Sku, Store,
};

use crate::handler::AvailabilityHandler;
use crate::ports::{AvailabilityStore, StoreResolver};
use crate::strategy::{AvailabilityStrategy, BatchAvailabilityStrategy};
use crate::types::{
    AvailabilityCriteria, ConcreteAvailability, SellableItemVerdict, SellableItemsRequest,
    SellableItemsResponse,
};

/// Decision rule shared by single and batch checks.
///
/// No cached row means not sellable; the never-out-of-stock flag overrides
/// everything; a zero requested quantity asks "is there any at all" and needs
/// a strictly positive availability; otherwise the cached value must cover
/// the requested quantity.
fn is_concrete_sellable(row: Option<&ConcreteAvailability>, quantity: Quantity) -> bool {
    let Some(row) = row else {
        return false;
    };
    if row.is_never_out_of_stock {
        return true;
    }
    if quantity.is_zero() {
        return row.availability.is_positive();
    }
    row.availability >= quantity
}

/// Answers "can this quantity be sold right now" from cached availability.
///
/// Single-item checks are read-through: a cache miss triggers a synchronous
/// refresh before re-reading. Batch checks read the cache as-is and treat
/// missing rows as not sellable.
#[derive(Clone)]
pub struct Sellable {
    availability_store: Arc<dyn AvailabilityStore>,
    stores: Arc<dyn StoreResolver>,
    handler: AvailabilityHandler,
    strategies: Vec<Arc<dyn AvailabilityStrategy>>,
    batch_strategy: Option<Arc<dyn BatchAvailabilityStrategy>>,
}

impl Sellable {
    pub fn new(
        availability_store: Arc<dyn AvailabilityStore>,
        stores: Arc<dyn StoreResolver>,
        handler: AvailabilityHandler,
    ) -> Self {
        Self {
            availability_store,
            stores,
            handler,
            strategies: Vec::new(),
            batch_strategy: None,
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<Arc<dyn AvailabilityStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_batch_strategy(mut self, strategy: Arc<dyn BatchAvailabilityStrategy>) -> Self {
        self.batch_strategy = Some(strategy);
        self
    }

    /// Whether `quantity` of the SKU can be sold in the store. The optional
    /// criteria scopes the check and is handed through to strategies.
    pub fn is_sellable_for_store(
        &self,
        sku: &Sku,
        quantity: Quantity,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> AvailabilityResult<bool> {
        let row = self.find_or_create_concrete(sku, store, criteria)?;
        let sellable = is_concrete_sellable(row.as_ref(), quantity);
        trace!(%sku, store = %store.name, %quantity, sellable, "sellability check");
        Ok(sellable)
    }

    /// Whether the product has any availability in the current store,
    /// addressed by internal product id. An id that resolves to no product
    /// is a hard error.
    pub fn is_product_concrete_available(
        &self,
        id: ProductConcreteId,
    ) -> AvailabilityResult<bool> {
        let store = self.stores.current_store()?;
        let sku = self
            .availability_store
            .sku_of_product_concrete(id)?
            .ok_or_else(|| {
                AvailabilityError::not_found(format!("no concrete product with id {id}"))
            })?;

        self.is_sellable_for_store(&sku, Quantity::ZERO, &store, None)
    }

    /// Batch sellability verdicts, one per requested item, in request order.
    pub fn are_sellable_for_store(
        &self,
        request: &SellableItemsRequest,
    ) -> AvailabilityResult<SellableItemsResponse> {
        if let Some(batch) = &self.batch_strategy {
            return batch.find_items_availability(request);
        }

        let skus: Vec<Sku> = request.items.iter().map(|item| item.sku.clone()).collect();
        let rows = self
            .availability_store
            .find_concrete_batch(&skus, &request.store)?;
        let by_sku: HashMap<&Sku, &ConcreteAvailability> =
            rows.iter().map(|row| (&row.sku, row)).collect();

        let items = request
            .items
            .iter()
            .map(|item| {
                let row = by_sku.get(&item.sku).copied();
                SellableItemVerdict {
                    sku: item.sku.clone(),
                    is_sellable: is_concrete_sellable(row, item.quantity),
                    available_quantity: row.map(|r| r.availability).unwrap_or_default(),
                }
            })
            .collect();

        Ok(SellableItemsResponse { items })
    }

    /// Cached availability row with strategy plugins applied, falling back to
    /// the read-through default path.
    pub fn find_or_create_concrete(
        &self,
        sku: &Sku,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> AvailabilityResult<Option<ConcreteAvailability>> {
        for strategy in &self.strategies {
            if strategy.is_applicable(sku, store, criteria) {
                return strategy.find_concrete_availability(sku, store, criteria);
            }
        }

        self.find_or_compute_concrete(sku, store)
    }

    fn find_or_compute_concrete(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<Option<ConcreteAvailability>> {
        if let Some(row) = self.availability_store.find_concrete(sku, store)? {
            return Ok(Some(row));
        }

        // Cache miss: compute and persist, then re-read what was written.
        self.handler.refresh_for_store(sku, store)?;
        self.availability_store.find_concrete(sku, store)
    }
}
