//! `stocksense-availability` — availability computation and caching engine.
//!
//! Computes net sellable quantity per concrete SKU and per abstract SKU from
//! stock and order reservations, caches the result per store, and answers
//! sellability queries for cart/checkout flows. Collaborators (stock lookup,
//! reservation lookup, persistence, notification sink) are traits defined in
//! [`ports`]; see `stocksense-infra` for in-memory implementations.

pub mod calculator;
pub mod checkout;
pub mod config;
pub mod facade;
pub mod handler;
pub mod ports;
pub mod reservation_display;
pub mod sellable;
pub mod strategy;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use calculator::AvailabilityCalculator;
pub use checkout::{
    CartItem, CartItemQuantityCounter, CheckoutAvailabilityPrecondition, CheckoutError,
    CheckoutResponse, DefaultCartItemQuantityCounter, Quote,
};
pub use config::AvailabilityConfig;
pub use facade::AvailabilityFacade;
pub use handler::AvailabilityHandler;
pub use ports::{
    AvailabilityStore, NotificationSink, ReservationLookup, StockLookup, StoreResolver,
};
pub use sellable::Sellable;
pub use strategy::{AvailabilityStrategy, BatchAvailabilityStrategy};
pub use types::{
    AbstractAvailability, AvailabilityCriteria, AvailabilityNotification, ConcreteAvailability,
    SellableItem, SellableItemVerdict, SellableItemsRequest, SellableItemsResponse, StockLine,
    WishlistItem,
};
