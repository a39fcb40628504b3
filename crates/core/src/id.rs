//! Strongly-typed identifiers used across the availability domain.

use serde::{Deserialize, Serialize};

/// Identifier of a store (sales channel scope of every cached row).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(u32);

/// Identifier of a persisted abstract availability row.
///
/// Returned by cache refreshes and carried by change notifications so that
/// external subscribers can re-publish the affected product family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbstractAvailabilityId(u64);

/// Internal numeric identifier of a concrete product variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductConcreteId(u64);

macro_rules! impl_numeric_newtype {
    ($t:ty, $inner:ty) => {
        impl $t {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $t {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $inner {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_numeric_newtype!(StoreId, u32);
impl_numeric_newtype!(AbstractAvailabilityId, u64);
impl_numeric_newtype!(ProductConcreteId, u64);
