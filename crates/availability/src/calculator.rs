//! Net availability calculation.

use std::sync::Arc;

use stocksense_core::{AbstractSku, AvailabilityResult, Quantity, Sku, Store};

use crate::ports::{AvailabilityStore, ReservationLookup, StockLookup};
use crate::types::{AbstractAvailability, ConcreteAvailability, StockLine};

/// Computes net sellable quantity: physical stock minus reserved quantity,
/// floored at zero. Stateless; every call goes to the lookups.
#[derive(Clone)]
pub struct AvailabilityCalculator {
    availability_store: Arc<dyn AvailabilityStore>,
    stock: Arc<dyn StockLookup>,
    reservations: Arc<dyn ReservationLookup>,
}

impl AvailabilityCalculator {
    pub fn new(
        availability_store: Arc<dyn AvailabilityStore>,
        stock: Arc<dyn StockLookup>,
        reservations: Arc<dyn ReservationLookup>,
    ) -> Self {
        Self {
            availability_store,
            stock,
            reservations,
        }
    }

    /// Net availability of a concrete SKU in a store.
    ///
    /// Callers that already hold fresh stock lines pass them via
    /// `known_stock_lines` to skip the stock lookup round trip.
    pub fn calculate_concrete(
        &self,
        sku: &Sku,
        store: &Store,
        known_stock_lines: Option<&[StockLine]>,
    ) -> AvailabilityResult<Quantity> {
        let reserved = self.reservations.sum_for_sku(sku, store)?;
        let physical = match known_stock_lines {
            Some(lines) => lines.iter().map(|line| line.quantity).sum(),
            None => self.stock.total_for_sku(sku, store)?,
        };

        Ok(physical.saturating_sub(reserved))
    }

    /// Net aggregate availability of a product family in a store.
    ///
    /// Computed from the family's total stock minus total reservations
    /// across all variants, not by summing already-floored concrete values.
    pub fn calculate_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Quantity> {
        let concrete_skus = self.availability_store.concrete_skus_of_abstract(abstract_sku)?;
        if concrete_skus.is_empty() {
            // Phantom/incomplete product family: no variants means no stock
            // and no reservations, so skip both lookups.
            return Ok(Quantity::ZERO);
        }

        let physical = self.stock.total_for_abstract(abstract_sku, store)?;
        let reserved = self.reservations.sum_for_skus(&concrete_skus, store)?;

        Ok(physical.saturating_sub(reserved))
    }

    /// Never-out-of-stock flag, straight from the stock subsystem (uncached).
    pub fn is_never_out_of_stock(&self, sku: &Sku, store: &Store) -> AvailabilityResult<bool> {
        self.stock.is_never_out_of_stock(sku, store)
    }

    /// Freshly computed concrete availability as a cache-row value.
    pub fn calculated_concrete(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<ConcreteAvailability> {
        Ok(ConcreteAvailability {
            sku: sku.clone(),
            store_id: store.id,
            availability: self.calculate_concrete(sku, store, None)?,
            is_never_out_of_stock: self.is_never_out_of_stock(sku, store)?,
        })
    }

    /// Freshly computed abstract availability as a cache-row value.
    pub fn calculated_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailability> {
        Ok(AbstractAvailability {
            abstract_sku: abstract_sku.clone(),
            store_id: store.id,
            availability: self.calculate_abstract(abstract_sku, store)?,
        })
    }
}
