//! Derived ship rating.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::rules::ShipRules;

const RATING_SCALE: f64 = 80.0;
const USED_FACTOR: f64 = 0.5;
const NEW_FACTOR: f64 = 1.0;

/// Round to two decimal places, ties to even.
///
/// Works on the exact binary value of `value`, so `0.125` becomes `0.12`
/// and `0.375` becomes `0.38`. Non-finite input is returned unchanged.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|decimal| decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

/// Rating of a ship with the given speed, usage flag, and production year.
///
/// `prod_year` must not exceed `rules.reference_year`. Validation against
/// rules that pass [`ShipRules::check`] guarantees this for stored ships,
/// keeping the divisor at least one.
pub fn rating(speed: f64, is_used: bool, prod_year: i32, rules: &ShipRules) -> f64 {
    let k = if is_used { USED_FACTOR } else { NEW_FACTOR };
    let age = f64::from(rules.reference_year - prod_year + 1);
    round2((RATING_SCALE * speed * k) / age)
}
