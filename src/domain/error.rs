//! Domain validation errors for odds values.
//!
//! Odds arithmetic never defaults a bad input to a neutral value: a zero
//! American price or a non-positive decimal price is always reported.
//!
//! # Examples
//!
//! ```
//! use closeline::domain::error::OddsError;
//! use closeline::domain::odds::american_to_decimal;
//!
//! assert!(matches!(american_to_decimal(0), Err(OddsError::ZeroAmericanOdds)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when an odds value violates its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OddsError {
    /// American odds are signed and never zero.
    #[error("american odds cannot be zero")]
    ZeroAmericanOdds,

    /// Decimal odds must be positive.
    #[error("decimal odds must be positive, got {odds}")]
    NonPositiveDecimal {
        /// The invalid odds that were provided.
        odds: Decimal,
    },

    /// A price that pays back less than the stake is not a valid market price.
    #[error("decimal odds must be greater than 1, got {odds}")]
    DecimalNotAboveOne {
        /// The invalid odds that were provided.
        odds: Decimal,
    },

    /// The American equivalent does not fit a signed 32-bit integer.
    #[error("decimal odds {odds} have no representable american equivalent")]
    AmericanOutOfRange {
        /// The decimal odds that were being converted.
        odds: Decimal,
    },

    /// The result does not fit in a [`Decimal`].
    #[error("odds arithmetic overflowed computing {quantity}")]
    Overflow {
        /// What was being computed.
        quantity: &'static str,
    },
}
