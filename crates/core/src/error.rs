//! Error model for the availability domain.

use thiserror::Error;

/// Result type used across the availability engine.
pub type AvailabilityResult<T> = Result<T, AvailabilityError>;

/// Availability-level error.
///
/// `NotFound` and `InvalidInput` are deterministic precondition failures;
/// `Storage` and `Lookup` wrap infrastructure failures from collaborators.
/// Ordinary unavailability of a product is **not** an error — it is a normal
/// sellability verdict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// A required record or mapping does not exist (e.g. a concrete SKU with
    /// no abstract parent). Signals a data-integrity precondition violation.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input rejected at the boundary (e.g. an empty criteria
    /// filter set).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The availability store failed (persistence boundary).
    #[error("storage failure: {0}")]
    Storage(String),

    /// A stock or reservation lookup failed. No retry and no fallback value;
    /// a wrong availability number is worse than a failed request.
    #[error("lookup failure: {0}")]
    Lookup(String),
}

impl AvailabilityError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }
}
