//! SKU newtypes.
//!
//! A **concrete SKU** identifies one purchasable product variant; an
//! **abstract SKU** identifies the product family grouping one or more
//! concrete variants. Keeping them as distinct types stops a family key from
//! being passed where a variant key is expected.

use serde::{Deserialize, Serialize};

/// SKU of a concrete product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

/// SKU of an abstract product (product family).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbstractSku(String);

macro_rules! impl_sku_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

impl_sku_newtype!(Sku);
impl_sku_newtype!(AbstractSku);
