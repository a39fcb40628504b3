//! Checkout availability precondition.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stocksense_core::{AvailabilityResult, Quantity, Sku, Store};

use crate::config::AvailabilityConfig;
use crate::sellable::Sellable;
use crate::types::{SellableItem, SellableItemsRequest};

/// One line of a quote entering checkout.
///
/// A set `amount` marks a measured/weighed line whose effective quantity is
/// not comparable to stock units; such lines are exempt from the
/// availability precondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: Sku,
    pub quantity: Quantity,
    pub amount: Option<Quantity>,
}

impl CartItem {
    pub fn new(sku: Sku, quantity: Quantity) -> Self {
        Self {
            sku,
            quantity,
            amount: None,
        }
    }
}

/// The quote being checked out: items against one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub store: Store,
    pub items: Vec<CartItem>,
}

/// Structured checkout rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutError {
    pub error_code: u16,
    pub error_type: String,
    pub message: String,
    pub parameters: HashMap<String, String>,
}

impl CheckoutError {
    pub fn new(error_code: u16, error_type: &str, message: &str) -> Self {
        Self {
            error_code,
            error_type: error_type.to_string(),
            message: message.to_string(),
            parameters: HashMap::new(),
        }
    }
}

/// Accumulated outcome of checkout precondition checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub is_success: bool,
    pub errors: Vec<CheckoutError>,
}

impl CheckoutResponse {
    pub fn new() -> Self {
        Self {
            is_success: true,
            errors: Vec::new(),
        }
    }
}

impl Default for CheckoutResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// How a cart line's effective quantity is counted for the availability
/// check. The default takes the line quantity verbatim; deployments with
/// bundled or packaged products substitute their own counting.
pub trait CartItemQuantityCounter: Send + Sync {
    fn count(&self, item: &CartItem, quote: &Quote) -> Quantity;
}

pub struct DefaultCartItemQuantityCounter;

impl CartItemQuantityCounter for DefaultCartItemQuantityCounter {
    fn count(&self, item: &CartItem, _quote: &Quote) -> Quantity {
        item.quantity
    }
}

/// Rejects checkouts containing items that cannot be sold in the requested
/// quantity. One error per failing item; passing items are not reported.
#[derive(Clone)]
pub struct CheckoutAvailabilityPrecondition {
    sellable: Sellable,
    config: AvailabilityConfig,
    quantity_counter: Arc<dyn CartItemQuantityCounter>,
}

impl CheckoutAvailabilityPrecondition {
    pub fn new(
        sellable: Sellable,
        config: AvailabilityConfig,
        quantity_counter: Arc<dyn CartItemQuantityCounter>,
    ) -> Self {
        Self {
            sellable,
            config,
            quantity_counter,
        }
    }

    /// Checks every countable quote item and appends one error per failing
    /// item to `response`. Returns whether the quote passed.
    pub fn check(
        &self,
        quote: &Quote,
        response: &mut CheckoutResponse,
    ) -> AvailabilityResult<bool> {
        let items: Vec<SellableItem> = quote
            .items
            .iter()
            .filter(|item| item.amount.is_none())
            .map(|item| SellableItem {
                sku: item.sku.clone(),
                quantity: self.quantity_counter.count(item, quote),
            })
            .collect();

        if items.is_empty() {
            return Ok(true);
        }

        let request = SellableItemsRequest::new(quote.store.clone(), items);
        let verdicts = self.sellable.are_sellable_for_store(&request)?;

        let mut failures = 0usize;
        for verdict in &verdicts.items {
            if verdict.is_sellable {
                continue;
            }
            failures += 1;
            debug!(sku = %verdict.sku, available = %verdict.available_quantity, "checkout item unavailable");
            response
                .errors
                .push(self.config.product_unavailable_error(&verdict.sku));
        }

        if failures > 0 {
            response.is_success = false;
        }

        Ok(failures == 0)
    }
}
