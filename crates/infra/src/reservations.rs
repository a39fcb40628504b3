//! In-memory order reservation ledger.

use std::collections::HashMap;
use std::sync::RwLock;

use stocksense_availability::ReservationLookup;
use stocksense_core::{AvailabilityResult, Quantity, Sku, Store, StoreId};

use crate::poisoned;

/// Accumulating reservation sums per (SKU, store).
#[derive(Default)]
pub struct InMemoryReservationLookup {
    reserved: RwLock<HashMap<(Sku, StoreId), Quantity>>,
}

impl InMemoryReservationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds to the reserved quantity, as a placed order would.
    pub fn reserve(&self, sku: &Sku, store: &Store, quantity: Quantity) -> AvailabilityResult<()> {
        let mut reserved = self.reserved.write().map_err(|_| poisoned("reserved"))?;
        let entry = reserved
            .entry((sku.clone(), store.id))
            .or_insert(Quantity::ZERO);
        *entry = entry.add(quantity);
        Ok(())
    }

    /// Subtracts from the reserved quantity, flooring at zero, as a shipped
    /// or cancelled order would.
    pub fn release(&self, sku: &Sku, store: &Store, quantity: Quantity) -> AvailabilityResult<()> {
        let mut reserved = self.reserved.write().map_err(|_| poisoned("reserved"))?;
        if let Some(entry) = reserved.get_mut(&(sku.clone(), store.id)) {
            *entry = entry.saturating_sub(quantity);
        }
        Ok(())
    }
}

impl ReservationLookup for InMemoryReservationLookup {
    fn sum_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity> {
        Ok(self
            .reserved
            .read()
            .map_err(|_| poisoned("reserved"))?
            .get(&(sku.clone(), store.id))
            .copied()
            .unwrap_or_default())
    }

    fn sum_for_skus(&self, skus: &[Sku], store: &Store) -> AvailabilityResult<Quantity> {
        let reserved = self.reserved.read().map_err(|_| poisoned("reserved"))?;
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
