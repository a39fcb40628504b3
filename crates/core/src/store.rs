//! Store value object.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::id::StoreId;

/// A store (sales channel). Availability is cached per (SKU, store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
}

impl Store {
    pub fn new(id: StoreId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl core::fmt::Display for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Store name to warehouse names, as exposed by the stock subsystem.
pub type StoreWarehouseMap = HashMap<String, Vec<String>>;
