//! Extension points for sellability resolution.

use stocksense_core::{AvailabilityResult, Sku, Store};

use crate::types::{
    AvailabilityCriteria, ConcreteAvailability, SellableItemsRequest, SellableItemsResponse,
};

/// Plugin that can take over the per-SKU availability lookup.
///
/// Strategies are consulted in registration order; the first one whose
/// [`AvailabilityStrategy::is_applicable`] returns `true` wins and
/// short-circuits the default read-through path entirely. A winning strategy
/// returning `None` means "no availability", not "fall through".
///
/// The optional criteria of the originating check is passed through so a
/// strategy can key its decision on it (e.g. only take over checks scoped to
/// particular stores).
pub trait AvailabilityStrategy: Send + Sync {
    fn is_applicable(
        &self,
        sku: &Sku,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> bool;

    fn find_concrete_availability(
        &self,
        sku: &Sku,
        store: &Store,
        criteria: Option<&AvailabilityCriteria>,
    ) -> AvailabilityResult<Option<ConcreteAvailability>>;
}

/// Plugin that replaces the default batch sellability check wholesale.
///
/// When registered, the whole request is delegated here and the default
/// cached-row path is bypassed.
pub trait BatchAvailabilityStrategy: Send + Sync {
    fn find_items_availability(
        &self,
        request: &SellableItemsRequest,
    ) -> AvailabilityResult<SellableItemsResponse>;
}
