//! Engine configuration.

use serde::{Deserialize, Serialize};

use stocksense_core::Sku;

use crate::checkout::CheckoutError;

pub const DEFAULT_UNAVAILABLE_ERROR_CODE: u16 = 4002;
pub const DEFAULT_UNAVAILABLE_ERROR_TYPE: &str = "Availability";
pub const DEFAULT_UNAVAILABLE_MESSAGE: &str = "product.unavailable";
pub const SKU_PARAMETER: &str = "%sku%";

/// Tunable knobs, primarily the shape of checkout rejection errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    pub unavailable_error_code: u16,
    pub unavailable_error_type: String,
    /// Translation key sent to storefronts; the offending SKU travels in the
    /// error parameters under [`SKU_PARAMETER`].
    pub unavailable_message: String,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            unavailable_error_code: DEFAULT_UNAVAILABLE_ERROR_CODE,
            unavailable_error_type: DEFAULT_UNAVAILABLE_ERROR_TYPE.to_string(),
            unavailable_message: DEFAULT_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

impl AvailabilityConfig {
    /// The structured checkout error for one unavailable product.
    pub fn product_unavailable_error(&self, sku: &Sku) -> CheckoutError {
        let mut error = CheckoutError::new(
            self.unavailable_error_code,
            &self.unavailable_error_type,
            &self.unavailable_message,
        );
        error
            .parameters
            .insert(SKU_PARAMETER.to_string(), sku.to_string());
        error
    }
}
