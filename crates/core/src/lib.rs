//! `stocksense-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod quantity;
pub mod sku;
pub mod store;

pub use error::{AvailabilityError, AvailabilityResult};
pub use id::{AbstractAvailabilityId, ProductConcreteId, StoreId};
pub use quantity::Quantity;
pub use sku::{AbstractSku, Sku};
pub use store::{Store, StoreWarehouseMap};
