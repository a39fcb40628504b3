//! Collaborator contracts (ports) consumed by the availability engine.
//!
//! Every operation is a synchronous blocking call; failures propagate as
//! [`AvailabilityError`] without retries or fabricated fallback values.
//! Engine components hold collaborators as `Arc<dyn Trait>` so independent
//! callers can share one wired instance across threads.

use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, AvailabilityResult, ProductConcreteId, Quantity, Sku,
    Store, StoreWarehouseMap,
};

use crate::types::{
    AbstractAvailability, AvailabilityCriteria, AvailabilityNotification, ConcreteAvailability,
};

/// Physical stock quantities, per store.
pub trait StockLookup: Send + Sync {
    /// Total physical stock of a concrete SKU in a store.
    fn total_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity>;

    /// Total physical stock of a whole product family in a store.
    fn total_for_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Quantity>;

    /// Whether the SKU is flagged "never out of stock" for the store.
    fn is_never_out_of_stock(&self, sku: &Sku, store: &Store) -> AvailabilityResult<bool>;

    /// Every store where the SKU has any stock definition. Drives the
    /// cross-store fan-out of a cache refresh.
    fn stores_with_stock_defined(&self, sku: &Sku) -> AvailabilityResult<Vec<Store>>;

    fn store_to_warehouse_mapping(&self) -> AvailabilityResult<StoreWarehouseMap>;
}

/// Quantities reserved by unfulfilled/in-process orders.
pub trait ReservationLookup: Send + Sync {
    fn sum_for_sku(&self, sku: &Sku, store: &Store) -> AvailabilityResult<Quantity>;

    fn sum_for_skus(&self, skus: &[Sku], store: &Store) -> AvailabilityResult<Quantity>;
}

/// Persistence boundary for cached availability rows.
///
/// Concrete rows are children of an abstract row: implementations must reject
/// a concrete save whose abstract parent row does not exist yet (`NotFound`).
pub trait AvailabilityStore: Send + Sync {
    fn find_concrete(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<Option<ConcreteAvailability>>;

    /// Bulk fetch; SKUs without a cached row are simply absent from the
    /// result.
    fn find_concrete_batch(
        &self,
        skus: &[Sku],
        store: &Store,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>>;

    fn find_concrete_by_criteria(
        &self,
        criteria: &AvailabilityCriteria,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>>;

    fn find_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<Option<AbstractAvailability>>;

    /// Upserts a concrete row. Returns `true` when a new row was created,
    /// `false` when an existing row was overwritten.
    fn save_concrete(&self, availability: &ConcreteAvailability) -> AvailabilityResult<bool>;

    /// Upserts the abstract row and returns its identifier.
    fn save_abstract(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
        quantity: Quantity,
    ) -> AvailabilityResult<AbstractAvailabilityId>;

    /// Abstract SKU owning the given concrete SKU, if the product is known.
    fn resolve_abstract_sku_of(&self, sku: &Sku) -> AvailabilityResult<Option<AbstractSku>>;

    fn concrete_skus_of_abstract(
        &self,
        abstract_sku: &AbstractSku,
    ) -> AvailabilityResult<Vec<Sku>>;

    fn sku_of_product_concrete(
        &self,
        id: ProductConcreteId,
    ) -> AvailabilityResult<Option<Sku>>;
}

/// Fire-and-forget sink for availability change notifications.
pub trait NotificationSink: Send + Sync {
    fn abstract_availability_changed(&self, notification: AvailabilityNotification);
}

/// Store/locale context resolution.
pub trait StoreResolver: Send + Sync {
    fn current_store(&self) -> AvailabilityResult<Store>;

    fn store_by_name(&self, name: &str) -> AvailabilityResult<Store>;
}
