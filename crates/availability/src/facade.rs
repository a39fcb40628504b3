//! Single entry point wiring the engine together.

use std::sync::Arc;

use stocksense_core::{
    AbstractAvailabilityId, AbstractSku, AvailabilityError, AvailabilityResult, ProductConcreteId,
    Quantity, Sku, Store, StoreWarehouseMap,
};

use crate::calculator::AvailabilityCalculator;
use crate::checkout::{
    CartItemQuantityCounter, CheckoutAvailabilityPrecondition, CheckoutResponse,
    DefaultCartItemQuantityCounter, Quote,
};
use crate::config::AvailabilityConfig;
use crate::handler::AvailabilityHandler;
use crate::ports::{
    AvailabilityStore, NotificationSink, ReservationLookup, StockLookup, StoreResolver,
};
use crate::sellable::Sellable;
use crate::strategy::{AvailabilityStrategy, BatchAvailabilityStrategy};
use crate::types::{
    AbstractAvailability, AvailabilityCriteria, AvailabilityNotification, ConcreteAvailability,
    SellableItemsRequest, SellableItemsResponse, WishlistItem,
};

/// Facade over calculation, caching, sellability and checkout checks.
///
/// Construct once with the wired collaborators and share via `Clone`; all
/// engine components sit behind `Arc`s.
#[derive(Clone)]
pub struct AvailabilityFacade {
    stock: Arc<dyn StockLookup>,
    availability_store: Arc<dyn AvailabilityStore>,
    notifications: Arc<dyn NotificationSink>,
    stores: Arc<dyn StoreResolver>,
    config: AvailabilityConfig,
    calculator: AvailabilityCalculator,
    handler: AvailabilityHandler,
    sellable: Sellable,
    quantity_counter: Arc<dyn CartItemQuantityCounter>,
    precondition: CheckoutAvailabilityPrecondition,
}

impl AvailabilityFacade {
    pub fn new(
        stock: Arc<dyn StockLookup>,
        reservations: Arc<dyn ReservationLookup>,
        availability_store: Arc<dyn AvailabilityStore>,
        notifications: Arc<dyn NotificationSink>,
        stores: Arc<dyn StoreResolver>,
        config: AvailabilityConfig,
    ) -> Self {
        let calculator = AvailabilityCalculator::new(
            availability_store.clone(),
            stock.clone(),
            reservations,
        );
        let handler = AvailabilityHandler::new(
            availability_store.clone(),
            stock.clone(),
            notifications.clone(),
            calculator.clone(),
        );
        let sellable = Sellable::new(availability_store.clone(), stores.clone(), handler.clone());
        let quantity_counter: Arc<dyn CartItemQuantityCounter> =
            Arc::new(DefaultCartItemQuantityCounter);
        let precondition = CheckoutAvailabilityPrecondition::new(
            sellable.clone(),
            config.clone(),
            quantity_counter.clone(),
        );

        Self {
            stock,
            availability_store,
            notifications,
            stores,
            config,
            calculator,
            handler,
            sellable,
            quantity_counter,
            precondition,
        }
    }

    /// Registers per-SKU sellability strategies, first applicable wins.
    pub fn with_strategies(mut self, strategies: Vec<Arc<dyn AvailabilityStrategy>>) -> Self {
        self.sellable = self.sellable.with_strategies(strategies);
        self.rebuild_precondition();
        self
    }

    /// Replaces the default batch sellability path.
    pub fn with_batch_strategy(mut self, strategy: Arc<dyn BatchAvailabilityStrategy>) -> Self {
        self.sellable = self.sellable.with_batch_strategy(strategy);
        self.rebuild_precondition();
        self
    }

    /// Replaces how cart line quantities are counted at checkout.
    pub fn with_quantity_counter(mut self, counter: Arc<dyn CartItemQuantityCounter>) -> Self {
        self.quantity_counter = counter;
        self.rebuild_precondition();
        self
    }

    fn rebuild_precondition(&mut self) {
        self.precondition = CheckoutAvailabilityPrecondition::new(
            self.sellable.clone(),
            self.config.clone(),
            self.quantity_counter.clone(),
        );
    }

    /// Whether `quantity` of the SKU can be sold in the store. The optional
    /// criteria scopes the check and reaches any registered strategies.
    pub fn is_product_sellable_for_store(
        &self,
        sku: &Sku,
        quantity: Quantity,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> AvailabilityResult<bool> {
        self.sellable
            .is_sellable_for_store(sku, quantity, store, criteria)
    }

    pub fn are_products_sellable_for_store(
        &self,
        request: &SellableItemsRequest,
    ) -> AvailabilityResult<SellableItemsResponse> {
        self.sellable.are_sellable_for_store(request)
    }

    pub fn is_product_concrete_available(
        &self,
        id: ProductConcreteId,
    ) -> AvailabilityResult<bool> {
        self.sellable.is_product_concrete_available(id)
    }

    /// Current net availability, computed fresh (the cache is not consulted
    /// and not written).
    pub fn calculate_availability_for_product_with_store(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<Quantity> {
        self.calculator.calculate_concrete(sku, store, None)
    }

    /// Recomputes and persists availability in every store with stock
    /// defined for the SKU.
    pub fn update_availability(
        &self,
        sku: &Sku,
    ) -> AvailabilityResult<Option<AbstractAvailabilityId>> {
        self.handler.refresh(sku)
    }

    pub fn update_availability_for_store(
        &self,
        sku: &Sku,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        self.handler.refresh_for_store(sku, store)
    }

    /// Persists an externally supplied quantity (import path).
    pub fn save_product_availability_for_store(
        &self,
        sku: &Sku,
        quantity: Quantity,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailabilityId> {
        self.handler.save_for_store(sku, quantity, store)
    }

    /// Cached concrete row, computing and caching it on a miss.
    pub fn find_or_create_product_concrete_availability(
        &self,
        sku: &Sku,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> AvailabilityResult<Option<ConcreteAvailability>> {
        self.sellable.find_or_create_concrete(sku, store, criteria)
    }

    /// Cached abstract row, computing one on a miss without persisting it.
    pub fn find_or_create_product_abstract_availability(
        &self,
        abstract_sku: &AbstractSku,
        store: &Store,
    ) -> AvailabilityResult<AbstractAvailability> {
        if let Some(row) = self.availability_store.find_abstract(abstract_sku, store)? {
            return Ok(row);
        }

        self.calculator.calculated_abstract(abstract_sku, store)
    }

    /// Re-announces an abstract availability row to downstream consumers
    /// without recomputing anything.
    pub fn touch_abstract_availability(&self, id: AbstractAvailabilityId) {
        self.notifications
            .abstract_availability_changed(AvailabilityNotification::new(id));
    }

    pub fn stores_where_product_availability_is_defined(
        &self,
        sku: &Sku,
    ) -> AvailabilityResult<Vec<Store>> {
        self.stock.stores_with_stock_defined(sku)
    }

    /// Filters the given product ids down to those with any availability in
    /// the current store. Order is preserved; an id resolving to no product
    /// is a hard error.
    pub fn filter_available_products(
        &self,
        ids: &[ProductConcreteId],
    ) -> AvailabilityResult<Vec<ProductConcreteId>> {
        let mut available = Vec::new();
        for id in ids {
            if self.sellable.is_product_concrete_available(*id)? {
                available.push(*id);
            }
        }
        Ok(available)
    }

    /// Bulk cache read. A criteria carrying an explicitly empty filter list
    /// is rejected as invalid input rather than silently matching nothing.
    pub fn product_concrete_availability_collection(
        &self,
        criteria: &AvailabilityCriteria,
    ) -> AvailabilityResult<Vec<ConcreteAvailability>> {
        if matches!(&criteria.skus, Some(skus) if skus.is_empty()) {
            return Err(AvailabilityError::invalid_input(
                "criteria sku filter must not be an empty list",
            ));
        }
        if matches!(&criteria.store_ids, Some(ids) if ids.is_empty()) {
            return Err(AvailabilityError::invalid_input(
                "criteria store filter must not be an empty list",
            ));
        }

        self.availability_store.find_concrete_by_criteria(criteria)
    }

    pub fn checkout_availability_precondition(
        &self,
        quote: &Quote,
        response: &mut CheckoutResponse,
    ) -> AvailabilityResult<bool> {
        self.precondition.check(quote, response)
    }

    /// Fills `availability` on a wishlist line from the current store's
    /// cache, computing on a miss.
    pub fn expand_wishlist_item_with_availability(
        &self,
        mut item: WishlistItem,
    ) -> AvailabilityResult<WishlistItem> {
        let store = self.stores.current_store()?;
        let row = self.sellable.find_or_create_concrete(&item.sku, &store, None)?;
        item.availability = Some(row.map(|r| r.availability).unwrap_or_default());
        Ok(item)
    }

    /// Fills `is_sellable` on a wishlist line for its requested quantity.
    pub fn expand_wishlist_item_with_sellable(
        &self,
        mut item: WishlistItem,
    ) -> AvailabilityResult<WishlistItem> {
        let store = self.stores.current_store()?;
        item.is_sellable = Some(self.sellable.is_sellable_for_store(
            &item.sku,
            item.quantity,
            &store,
            None,
        )?);
        Ok(item)
    }

    pub fn store_to_warehouse_mapping(&self) -> AvailabilityResult<StoreWarehouseMap> {
        self.stock.store_to_warehouse_mapping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{
        RecordingSink, StubAvailabilityStore, StubReservations, StubStock, StubStores, store_de,
    };

    struct Fixture {
        stock: Arc<StubStock>,
        availability_store: Arc<StubAvailabilityStore>,
        sink: Arc<RecordingSink>,
        facade: AvailabilityFacade,
    }

    fn fixture() -> Fixture {
        let stock = Arc::new(StubStock::default());
        let reservations = Arc::new(StubReservations::default());
        let availability_store = Arc::new(StubAvailabilityStore::default());
        let sink = Arc::new(RecordingSink::default());

        let facade = AvailabilityFacade::new(
            stock.clone(),
            reservations,
            availability_store.clone(),
            sink.clone(),
            Arc::new(StubStores::new(store_de())),
            AvailabilityConfig::default(),
        );

        Fixture {
            stock,
            availability_store,
            sink,
            facade,
        }
    }

    fn seed(fixture: &Fixture, id: ProductConcreteId, sku: &Sku, available: Quantity) {
        let abstract_sku = AbstractSku::from(format!("{sku}-abstract"));
        fixture
            .availability_store
            .register_product(id, sku, &abstract_sku);
        fixture.stock.link_variant(&abstract_sku, sku);
        fixture.stock.set_stock(sku, &store_de(), available);
        fixture
            .facade
            .update_availability_for_store(sku, &store_de())
            .unwrap();
    }

    #[test]
    fn filter_available_products_keeps_order_and_drops_unavailable_ids() {
        let fixture = fixture();
        let in_stock = Sku::from("sku-in");
        let out_of_stock = Sku::from("sku-out");
        seed(&fixture, 1.into(), &in_stock, Quantity::from(3u32));
        seed(&fixture, 2.into(), &out_of_stock, Quantity::ZERO);

        let filtered = fixture
            .facade
            .filter_available_products(&[2.into(), 1.into()])
            .unwrap();
        assert_eq!(filtered, vec![ProductConcreteId::new(1)]);

        let err = fixture
            .facade
            .filter_available_products(&[1.into(), 99.into()])
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::NotFound(_)));
    }

    #[test]
    fn collection_rejects_explicitly_empty_filters() {
        let fixture = fixture();

        let criteria = AvailabilityCriteria {
            skus: Some(vec![]),
            store_ids: None,
        };
        let err = fixture
            .facade
            .product_concrete_availability_collection(&criteria)
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::InvalidInput(_)));

        // Absent filters are fine.
        let all = fixture
            .facade
            .product_concrete_availability_collection(&AvailabilityCriteria::default())
            .unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn find_or_create_abstract_computes_on_a_miss_without_persisting() {
        let fixture = fixture();
        let abstract_sku = AbstractSku::from("sku-ghost");

        let row = fixture
            .facade
            .find_or_create_product_abstract_availability(&abstract_sku, &store_de())
            .unwrap();

        assert_eq!(row.availability, Quantity::ZERO);
        assert!(
            fixture
                .availability_store
                .find_abstract(&abstract_sku, &store_de())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn touch_notifies_without_recomputation() {
        let fixture = fixture();

        fixture
            .facade
            .touch_abstract_availability(AbstractAvailabilityId::new(7));

        let recorded = fixture.sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].abstract_availability_id,
            AbstractAvailabilityId::new(7)
        );
    }

    #[test]
    fn wishlist_expansion_fills_availability_and_sellability() {
        let fixture = fixture();
        let sku = Sku::from("sku-123-321");
        seed(&fixture, 1.into(), &sku, Quantity::from(4u32));

        let item = WishlistItem::new(sku.clone(), Quantity::from(2u32));
        let item = fixture
            .facade
            .expand_wishlist_item_with_availability(item)
            .unwrap();
        let item = fixture
            .facade
            .expand_wishlist_item_with_sellable(item)
            .unwrap();

        assert_eq!(item.availability, Some(Quantity::from(4u32)));
        assert_eq!(item.is_sellable, Some(true));

        let greedy = WishlistItem::new(sku, Quantity::from(9u32));
        let greedy = fixture
            .facade
            .expand_wishlist_item_with_sellable(greedy)
            .unwrap();
        assert_eq!(greedy.is_sellable, Some(false));
    }

    #[test]
    fn calculate_does_not_touch_the_cache() {
        let fixture = fixture();
        let sku = Sku::from("sku-fresh");
        let abstract_sku = AbstractSku::from("sku-fresh-abstract");
        fixture
            .availability_store
            .register_product(1.into(), &sku, &abstract_sku);
        fixture.stock.link_variant(&abstract_sku, &sku);
        fixture.stock.set_stock(&sku, &store_de(), Quantity::from(6u32));

        let quantity = fixture
            .facade
            .calculate_availability_for_product_with_store(&sku, &store_de())
            .unwrap();

        assert_eq!(quantity, Quantity::from(6u32));
        assert!(
            fixture
                .availability_store
                .find_concrete(&sku, &store_de())
                .unwrap()
                .is_none()
        );
        assert_eq!(fixture.sink.count(), 0);
    }
}
