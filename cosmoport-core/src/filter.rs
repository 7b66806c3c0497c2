//! Composable ship filters.
//!
//! A [`ShipFilter`] holds the optional inputs of a listing request. Building
//! it yields a [`ShipPredicate`]: one [`Criterion`] per present input, joined
//! with AND. Inputs that are absent add no criterion at all, so a filter with
//! nothing set matches the whole collection.
//!
//! Stores either evaluate a predicate in memory through
//! [`ShipPredicate::matches`] or translate [`ShipPredicate::criteria`] into
//! their own query language.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipType};
use crate::error::{Result, ShipError};

/// Optional filter inputs as received from a listing or counting request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipFilter {
    /// Case-sensitive substring of the ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Case-sensitive substring of the planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Exact ship class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Earliest production timestamp (epoch millis, inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Latest production timestamp (epoch millis, inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Required usage flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Minimum speed (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Maximum speed (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Minimum crew size (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Maximum crew size (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Minimum rating (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Maximum rating (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Compose the present inputs into a predicate.
    ///
    /// Fails with a bad request when a timestamp bound cannot be represented.
    pub fn build(&self) -> Result<ShipPredicate> {
        let after = self.after.map(timestamp).transpose()?;
        let before = self.before.map(timestamp).transpose()?;

        Ok(ShipPredicate::from_optional([
            self.name.clone().map(Criterion::NameContains),
            self.planet.clone().map(Criterion::PlanetContains),
            self.ship_type.map(Criterion::ShipTypeIs),
            Range::new(after, before).map(Criterion::ProdDate),
            self.is_used.map(Criterion::Usage),
            Range::new(self.min_speed, self.max_speed).map(Criterion::Speed),
            Range::new(self.min_crew_size, self.max_crew_size).map(Criterion::CrewSize),
            Range::new(self.min_rating, self.max_rating).map(Criterion::Rating),
        ]))
    }
}

/// Earliest year a SQL `TIMESTAMP` column holds (4713 BC).
const EARLIEST_TIMESTAMP_YEAR: i32 = -4712;

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .filter(|at| at.year() >= EARLIEST_TIMESTAMP_YEAR)
        .ok_or_else(|| ShipError::bad_request(format!("Timestamp out of range: {millis}")))
}

/// Inclusive range with optional ends; a missing end is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    /// Lower bound, if any.
    pub min: Option<T>,
    /// Upper bound, if any.
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    /// `None` when both ends are absent, since such a range constrains nothing.
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Whether `value` lies within the present bounds.
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A single test against one ship field.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Name contains the fragment.
    NameContains(String),
    /// Planet contains the fragment.
    PlanetContains(String),
    /// Ship class equals the value.
    ShipTypeIs(ShipType),
    /// Production timestamp within the range.
    ProdDate(Range<DateTime<Utc>>),
    /// Usage flag equals the value.
    Usage(bool),
    /// Speed within the range.
    Speed(Range<f64>),
    /// Crew size within the range.
    CrewSize(Range<i32>),
    /// Rating within the range.
    Rating(Range<f64>),
}

impl Criterion {
    /// Evaluate this criterion against `ship`.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Criterion::NameContains(fragment) => ship.name.contains(fragment.as_str()),
            Criterion::PlanetContains(fragment) => ship.planet.contains(fragment.as_str()),
            Criterion::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Criterion::ProdDate(range) => range.contains(ship.prod_date),
            Criterion::Usage(is_used) => ship.is_used == *is_used,
            Criterion::Speed(range) => range.contains(ship.speed),
            Criterion::CrewSize(range) => range.contains(ship.crew_size),
            Criterion::Rating(range) => range.contains(ship.rating),
        }
    }
}

/// Conjunction of criteria. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPredicate {
    criteria: Vec<Criterion>,
}

impl ShipPredicate {
    /// A predicate that matches every ship.
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep the criteria that are present; absent ones add no constraint.
    pub fn from_optional(criteria: impl IntoIterator<Item = Option<Criterion>>) -> Self {
        Self {
            criteria: criteria.into_iter().flatten().collect(),
        }
    }

    /// The criteria to AND together.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// True when no criterion is present.
    pub fn is_unconstrained(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Whether `ship` satisfies every criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(ship))
    }
}
