//! Infrastructure layer: in-memory implementations of the availability
//! engine's collaborator ports, suitable for tests, demos and single-process
//! deployments.

pub mod availability_store;
pub mod notifications;
pub mod reservations;
pub mod stock;
pub mod stores;


pub use availability_store::InMemoryAvailabilityStore;
pub use notifications::{LoggingNotificationSink, RecordingNotificationSink};
pub use reservations::InMemoryReservationLookup;
pub use stock::InMemoryStockLookup;
pub use stores::FixedStoreResolver;

use stocksense_core::AvailabilityError;

/// Maps a poisoned lock to a storage error instead of panicking.
pub(crate) fn poisoned(what: &str) -> AvailabilityError {
    AvailabilityError::storage(format!("{what} lock poisoned"))
}
