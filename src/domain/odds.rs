//! Odds conversions and closing-line-value arithmetic.
//!
//! Decimal odds are carried as [`Decimal`] so that probabilities like
//! `1 / 2.5 = 0.4` come out exact. American odds are signed integers.
//!
//! # Examples
//!
//! ```
//! use closeline::domain::odds::{american_to_decimal, implied_probability};
//! use rust_decimal_macros::dec;
//!
//! let decimal = american_to_decimal(150).unwrap();
//! assert_eq!(decimal, dec!(2.5));
//! assert_eq!(implied_probability(decimal).unwrap(), dec!(0.4));
//! ```

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::OddsError;

const HUNDRED: Decimal = dec!(100);

/// Relative movement between an opening and a closing decimal price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clv {
    /// `(closing - opening) / opening`.
    pub clv_decimal: Decimal,
    /// `clv_decimal * 100`.
    pub clv_percent: Decimal,
}

/// Convert American odds to decimal odds.
///
/// `+150` becomes `2.5`, `-150` becomes `1.666…`.
///
/// # Errors
/// Returns [`OddsError::ZeroAmericanOdds`] for `0`.
pub fn american_to_decimal(american: i32) -> Result<Decimal, OddsError> {
    let odds = Decimal::from(american);
    match american.cmp(&0) {
        Ordering::Greater => Ok(odds / HUNDRED + Decimal::ONE),
        Ordering::Less => Ok(HUNDRED / odds.abs() + Decimal::ONE),
        Ordering::Equal => Err(OddsError::ZeroAmericanOdds),
    }
}

/// Convert decimal odds to the nearest American price.
///
/// American odds are an integer encoding, so this is lossy: converting the
/// result back with [`american_to_decimal`] only approximates the input.
///
/// # Errors
/// Returns an error when `decimal <= 1` or the result overflows `i32`.
pub fn decimal_to_american(decimal: Decimal) -> Result<i32, OddsError> {
    let decimal = validate_decimal_odds(decimal)?;
    let profit = decimal - Decimal::ONE;
    let out_of_range = OddsError::AmericanOutOfRange { odds: decimal };
    let american = if decimal >= dec!(2) {
        profit.checked_mul(HUNDRED)
    } else {
        HUNDRED.checked_div(profit).map(|d| -d)
    }
    .ok_or_else(|| out_of_range.clone())?;
    round_half_away(american).to_i32().ok_or(out_of_range)
}

/// Probability implied by a decimal price, ignoring bookmaker margin.
///
/// # Errors
/// Returns [`OddsError::NonPositiveDecimal`] when `decimal <= 0`.
pub fn implied_probability(decimal: Decimal) -> Result<Decimal, OddsError> {
    if decimal <= Decimal::ZERO {
        return Err(OddsError::NonPositiveDecimal { odds: decimal });
    }
    Decimal::ONE
        .checked_div(decimal)
        .ok_or(OddsError::Overflow {
            quantity: "implied probability",
        })
}

/// Check that a decimal price is a valid market price (strictly above 1).
///
/// # Errors
/// Returns an error for non-positive odds or odds of at most 1.
pub fn validate_decimal_odds(decimal: Decimal) -> Result<Decimal, OddsError> {
    if decimal <= Decimal::ZERO {
        return Err(OddsError::NonPositiveDecimal { odds: decimal });
    }
    if decimal <= Decimal::ONE {
        return Err(OddsError::DecimalNotAboveOne { odds: decimal });
    }
    Ok(decimal)
}

/// Closing line value between two decimal prices.
///
/// The delta is taken relative to the opening price: a closing price
/// shorter than the opening one yields a negative value.
///
/// # Errors
/// Returns [`OddsError::NonPositiveDecimal`] if either price is not positive,
/// or [`OddsError::Overflow`] if the percentage does not fit a [`Decimal`].
pub fn compute_clv(opening: Decimal, closing: Decimal) -> Result<Clv, OddsError> {
    for odds in [opening, closing] {
        if odds <= Decimal::ZERO {
            return Err(OddsError::NonPositiveDecimal { odds });
        }
    }
    let overflow = OddsError::Overflow { quantity: "clv" };
    let clv_decimal = (closing - opening)
        .checked_div(opening)
        .ok_or_else(|| overflow.clone())?;
    let clv_percent = clv_decimal.checked_mul(HUNDRED).ok_or(overflow)?;
    Ok(Clv {
        clv_decimal,
        clv_percent,
    })
}

/// Line movement in cents between two American prices.
///
/// Positive means the bettor's opening price beat the close:
/// - both positive: `closing - opening`
/// - both negative: `opening - closing` (a less negative number is better)
/// - mixed signs: decimal difference times 100, rounded half away from zero
///
/// # Errors
/// Returns [`OddsError::ZeroAmericanOdds`] if either price is zero.
pub fn compute_cents_clv(opening: i32, closing: i32) -> Result<i64, OddsError> {
    if opening == 0 || closing == 0 {
        return Err(OddsError::ZeroAmericanOdds);
    }
    let (opening_wide, closing_wide) = (i64::from(opening), i64::from(closing));
    if opening > 0 && closing > 0 {
        return Ok(closing_wide - opening_wide);
    }
    if opening < 0 && closing < 0 {
        return Ok(opening_wide - closing_wide);
    }

    let delta = american_to_decimal(closing)? - american_to_decimal(opening)?;
    // Bounded by the i32 input range, so the conversion cannot fail.
    Ok(round_half_away(delta * HUNDRED).to_i64().unwrap_or_default())
}

fn round_half_away(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
