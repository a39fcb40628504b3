//! Cache refresh orchestration.

use std::sync::Arc;

use tracing::debug;

use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, AvailabilityError, AvailabilityResult, ProductConcreteId,
    Quantity, Sku, Store,
};

use crate::calculator::AvailabilityCalculator;
use crate::ports::{AvailabilityStore, NotificationSink, StockLookup};
use crate::types::{AvailabilityNotification, ConcreteAvailability};

/// Recomputes and persists availability for a concrete SKU and its product
/// family, store by store.
///
/// Writes are write-through: rows are persisted even when the value did not
/// change. Change notifications are value-triggered: one notification per
/// target store whose stored concrete value actually changed, so unchanged
/// refreshes cause no downstream reindexing.
///
/// No locking is taken around the read-compute-write sequence; two
/// concurrent refreshes for the same (SKU, store) interleave and the last
/// writer wins.
#[derive(Clone)]
pub struct AvailabilityHandler {
    availability_store: Arc<dyn AvailabilityStore>,
    stock: Arc<dyn StockLookup>,
    notifications: Arc<dyn NotificationSink>,
    calculator: AvailabilityCalculator,
}

impl AvailabilityHandler {
    pub fn new(
        availability_store: Arc<dyn AvailabilityStore>,
        stock: Arc<dyn StockLookup>,
        notifications: Arc<dyn NotificationSink>,
        calculator: AvailabilityCalculator,
    ) -> Self {
        Self {
            availability_store,
            stock,
            notifications,
            calculator,
        }
    }

    /// Recomputes availability for every store where the SKU has a stock
    /// definition.
    ///
    /// Returns the abstract availability id of the last refreshed store, or
    /// `None` when the SKU has stock defined nowhere (nothing was written).
    pub fn refresh(&self, sku: &Sku) -> AvailabilityResult<Option<AbstractAvailabilityId>> {
        let abstract_sku = self.resolve_abstract_sku(sku)?;
        let stores = self.stock.stores_with_stock_defined(sku)?;

        let mut last = None;
        for store in &stores {
            let quantity = self.calculator.calculate_concrete(sku, store, None)?;
            let never_out_of_stock = self.calculator.is_never_out_of_stock(sku, store)?;
            last = Some(self.store_availability(
                sku,
                &abstract_sku,
                store,
                quantity,
                never_out_of_stock,
            )?);
        }

        Ok(last)
    }

    /// Recomputes availability for one store only.
    pub fn refresh_for_store(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let abstract_sku = self.resolve_abstract_sku(sku)?;
        let quantity = self.calculator.calculate_concrete(sku, store, None)?;
        let never_out_of_stock = self.calculator.is_never_out_of_stock(sku, store)?;

        self.store_availability(sku, &abstract_sku, store, quantity, never_out_of_stock)
    }

    /// [`Self::refresh_for_store`] addressed by internal product id.
    pub fn refresh_by_product_concrete_id(
        &self,
        id: ProductConcreteId,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let sku = self
            .availability_store
            .sku_of_product_concrete(id)?
            .ok_or_else(|| {
                AvailabilityError::not_found(format!("no concrete product with id {id}"))
            })?;

        self.refresh_for_store(&sku, store)
    }

    /// Persists an explicitly supplied quantity (import/backfill path) under
    /// the same persistence and notification rules as a refresh.
    pub fn save_for_store(
        &self,
        sku: &Sku,
        quantity: Quantity,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let abstract_sku = self.resolve_abstract_sku(sku)?;
        let never_out_of_stock = self.calculator.is_never_out_of_stock(sku, store)?;

        self.store_availability(sku, &abstract_sku, store, quantity, never_out_of_stock)
    }

    fn resolve_abstract_sku(&self, sku: &Sku) -> AvailabilityResult<AbstractSku> {
        self.availability_store
            .resolve_abstract_sku_of(sku)?
            .ok_or_else(|| {
                AvailabilityError::not_found(format!("no abstract product for concrete sku {sku}"))
            })
    }

    fn store_availability(
        &self,
        sku: &Sku,
        abstract_sku: &AbstractSku,
        store: &Store,
        quantity: Quantity,
        is_never_out_of_stock: bool,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        let previous = self.availability_store.find_concrete(sku, store)?;
        let changed = match &previous {
            Some(row) => {
                row.availability != quantity || row.is_never_out_of_stock != is_never_out_of_stock
            }
            None => true,
        };

        // The abstract row is the foreign-key parent of the concrete row and
        // must exist before the concrete save.
        let abstract_quantity = self.calculator.calculate_abstract(abstract_sku, store)?;
        let abstract_id =
            self.availability_store
                .save_abstract(abstract_sku, store, abstract_quantity)?;

        self.availability_store.save_concrete(&ConcreteAvailability {
            sku: sku.clone(),
            store_id: store.id,
            availability: quantity,
            is_never_out_of_stock,
        })?;

        if changed {
            debug!(
                %sku,
                store = %store.name,
                availability = %quantity,
                "availability changed, notifying"
            );
            self.notifications
                .abstract_availability_changed(AvailabilityNotification::new(abstract_id));
        }

        Ok(abstract_id)
    }
}
