//! Parsing of legacy reservation display sets.
//!
//! Older storefront exports encode per-store reservations as an unordered
//! set of `"sku:quantity"` strings and never-out-of-stock flags as a set of
//! truthy markers. These helpers tolerate the formats found in the wild.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use stocksense_core::Quantity;

/// Sums the quantities of a raw reservation entry set.
///
/// Entries are deduplicated first (the legacy format repeats lines on
/// re-export). Malformed entries, entries with an empty SKU and entries with
/// a non-numeric quantity are skipped rather than failing the whole set.
pub fn reserved_quantity_from_set<'a, I>(entries: I) -> Quantity
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: HashSet<&str> = entries.into_iter().collect();

    unique
        .into_iter()
        .filter_map(|entry| {
            let (sku, quantity) = entry.split_once(':')?;
            if sku.trim().is_empty() {
                return None;
            }
            Decimal::from_str(quantity.trim()).ok()
        })
        .map(Quantity::new)
        .sum()
}

/// Whether any entry of a flag set marks the product never-out-of-stock.
pub fn never_out_of_stock_from_set<'a, I>(flags: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    flags.into_iter().any(|flag| {
        matches!(
            flag.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
}
