//! Domain limits shared by validation and rating.

use crate::error::{Result, ShipError};

/// The "present day" of the domain; ratings count years back from it.
pub const REFERENCE_YEAR: i32 = 3019;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = REFERENCE_YEAR;
/// Slowest accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Maximum length, in characters, of `name` and `planet`.
pub const MAX_TEXT_LENGTH: usize = 50;

/// Limits applied to ship records.
///
/// `Default` yields the registry constants above.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipRules {
    /// Year used as "now" by the rating formula.
    pub reference_year: i32,
    /// Inclusive lower bound of the production year.
    pub min_prod_year: i32,
    /// Inclusive upper bound of the production year.
    pub max_prod_year: i32,
    /// Inclusive lower bound of the speed.
    pub min_speed: f64,
    /// Inclusive upper bound of the speed.
    pub max_speed: f64,
    /// Inclusive lower bound of the crew size.
    pub min_crew_size: i32,
    /// Inclusive upper bound of the crew size.
    pub max_crew_size: i32,
    /// Maximum length of text fields.
    pub max_text_length: usize,
}

impl Default for ShipRules {
    fn default() -> Self {
        Self {
            reference_year: REFERENCE_YEAR,
            min_prod_year: MIN_PROD_YEAR,
            max_prod_year: MAX_PROD_YEAR,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            min_crew_size: MIN_CREW_SIZE,
            max_crew_size: MAX_CREW_SIZE,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

impl ShipRules {
    /// Reject windows the rating formula cannot handle.
    ///
    /// Production years must form a non-empty window ending no later than
    /// `reference_year`, which keeps the rating divisor at least one.
    pub fn check(&self) -> Result<()> {
        if self.min_prod_year > self.max_prod_year {
            return Err(ShipError::bad_request(format!(
                "Inconsistent ship rules: min_prod_year {} is after max_prod_year {}",
                self.min_prod_year, self.max_prod_year
            )));
        }
        if self.max_prod_year > self.reference_year {
            return Err(ShipError::bad_request(format!(
                "Inconsistent ship rules: max_prod_year {} is after reference_year {}",
                self.max_prod_year, self.reference_year
            )));
        }
        Ok(())
    }
}
