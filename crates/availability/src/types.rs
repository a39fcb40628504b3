//! Data model of the availability engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, Quantity, Sku, Store, StoreId,
};

/// Cached sellable-quantity state for one (concrete SKU, store) pair.
///
/// When `is_never_out_of_stock` is set the `availability` value is not
/// authoritative for sellability decisions; the product is treated as
/// infinitely available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteAvailability {
    pub sku: Sku,
    pub store_id: StoreId,
    pub availability: Quantity,
    pub is_never_out_of_stock: bool,
}

/// Cached aggregate sellable quantity for a product family in a store.
///
/// The aggregate is computed from total abstract stock minus total
/// reservations across all variant SKUs, not by summing already-floored
/// concrete rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractAvailability {
    pub abstract_sku: AbstractSku,
    pub store_id: StoreId,
    pub availability: Quantity,
}

/// Immutable query descriptor for bulk retrieval.
///
/// An absent filter means "no restriction on that dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCriteria {
    pub skus: Option<Vec<Sku>>,
    pub store_ids: Option<Vec<StoreId>>,
}

impl AvailabilityCriteria {
    pub fn with_skus(skus: impl IntoIterator<Item = Sku>) -> Self {
        Self {
            skus: Some(skus.into_iter().collect()),
            store_ids: None,
        }
    }

    pub fn matches(&self, sku: &Sku, store_id: StoreId) -> bool {
        if let Some(skus) = &self.skus {
            if !skus.contains(sku) {
                return false;
            }
        }
        if let Some(store_ids) = &self.store_ids {
            if !store_ids.contains(&store_id) {
                return false;
            }
        }
        true
    }
}

/// One stock definition line, as supplied by callers that already hold fresh
/// stock data (saves the calculator a lookup round trip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    pub warehouse: String,
    pub quantity: Quantity,
}

/// One item of a batch sellability request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellableItem {
    pub sku: Sku,
    pub quantity: Quantity,
}

/// Batch sellability request: several items checked against one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellableItemsRequest {
    pub store: Store,
    pub items: Vec<SellableItem>,
}

impl SellableItemsRequest {
    pub fn new(store: Store, items: Vec<SellableItem>) -> Self {
        Self { store, items }
    }
}

/// Per-item verdict of a batch sellability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellableItemVerdict {
    pub sku: Sku,
    pub is_sellable: bool,
    /// Cached availability the verdict was computed against; zero when no
    /// cached row was found.
    pub available_quantity: Quantity,
}

/// Batch sellability response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellableItemsResponse {
    pub items: Vec<SellableItemVerdict>,
}

/// Change notification emitted when a refresh actually changed a stored
/// concrete availability value. Consumed fire-and-forget by an external
/// publish/reindex subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityNotification {
    pub event_id: Uuid,
    pub abstract_availability_id: AbstractAvailabilityId,
    pub occurred_at: DateTime<Utc>,
}

impl AvailabilityNotification {
    pub fn new(abstract_availability_id: AbstractAvailabilityId) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            abstract_availability_id,
            occurred_at: Utc::now(),
        }
    }
}

/// A wishlist line, expandable with availability data for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub sku: Sku,
    pub quantity: Quantity,
    pub availability: Option<Quantity>,
    pub is_sellable: Option<bool>,
}

impl WishlistItem {
    pub fn new(sku: Sku, quantity: Quantity) -> Self {
        Self {
            sku,
            quantity,
            availability: None,
            is_sellable: None,
        }
    }
}
