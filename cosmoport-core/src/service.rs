//! Ship registry operations.

use chrono::Datelike;
use log::debug;

use crate::domain::{NewShip, Ship, ShipDraft};
use crate::error::{Result, ShipError};
use crate::filter::ShipPredicate;
use crate::page::PageRequest;
use crate::rating::{rating, round2};
use crate::repository::ShipRepository;
use crate::rules::ShipRules;
use crate::validator::{require_complete, validate_present};

const NOT_FOUND: &str = "Ship not found";

/// Parse a caller-supplied ship identifier.
///
/// Missing, empty, and `"0"` identifiers are rejected, as is anything that is
/// not an integer.
pub fn parse_id(raw: Option<&str>) -> Result<i64> {
    let raw = match raw {
        None | Some("") | Some("0") => {
            return Err(ShipError::bad_request(format!("Invalid ship id: {raw:?}")));
        }
        Some(raw) => raw,
    };
    raw.parse::<i64>()
        .map_err(|err| ShipError::bad_request(format!("Ship id is not a number: {raw} ({err})")))
}

/// Validates, rates, and persists ships through a [`ShipRepository`].
///
/// Holds no per-request state; every check runs before the store is touched.
#[derive(Debug, Clone)]
pub struct ShipService<R> {
    repository: R,
    rules: ShipRules,
}

impl<R: ShipRepository> ShipService<R> {
    /// Service with the default registry rules.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            rules: ShipRules::default(),
        }
    }

    /// Service with custom rules; fails when [`ShipRules::check`] does.
    pub fn with_rules(repository: R, rules: ShipRules) -> Result<Self> {
        rules.check()?;
        Ok(Self { repository, rules })
    }

    /// Rules in effect.
    pub fn rules(&self) -> &ShipRules {
        &self.rules
    }

    /// Create a ship from a complete draft.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let draft = normalize(draft);
        require_complete(&draft)?;
        validate_present(&draft, &self.rules)?;

        let (Some(name), Some(planet), Some(ship_type), Some(prod_date), Some(speed), Some(crew_size)) = (
            draft.name,
            draft.planet,
            draft.ship_type,
            draft.prod_date,
            draft.speed,
            draft.crew_size,
        ) else {
            return Err(ShipError::bad_request("One of Ship params is null"));
        };
        let is_used = draft.is_used.unwrap_or(false);
        let ship = NewShip {
            name,
            planet,
            ship_type,
            prod_date,
            is_used,
            speed,
            crew_size,
            rating: rating(speed, is_used, prod_date.year(), &self.rules),
        };

        let stored = self.repository.insert(ship)?;
        debug!("created ship {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    /// Fetch a ship.
    pub fn get(&self, id: i64) -> Result<Ship> {
        if !self.repository.exists_by_id(id)? {
            return Err(ShipError::not_found(NOT_FOUND));
        }
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| ShipError::not_found(NOT_FOUND))
    }

    /// Apply the fields present in `draft` to an existing ship.
    ///
    /// The rating is recomputed from the merged record whether or not any of
    /// its inputs changed.
    pub fn edit(&self, id: i64, draft: ShipDraft) -> Result<Ship> {
        let draft = normalize(draft);
        validate_present(&draft, &self.rules)?;

        if !self.repository.exists_by_id(id)? {
            return Err(ShipError::not_found(NOT_FOUND));
        }
        let mut ship = self
            .repository
            .find_by_id(id)?
            .ok_or_else(|| ShipError::not_found(NOT_FOUND))?;

        draft.merge_into(&mut ship);
        ship.rating = rating(ship.speed, ship.is_used, ship.prod_year(), &self.rules);

        let stored = self.repository.save(&ship)?;
        debug!("updated ship {}", stored.id);
        Ok(stored)
    }

    /// Delete a ship.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.exists_by_id(id)? {
            return Err(ShipError::not_found(NOT_FOUND));
        }
        self.repository.delete_by_id(id)?;
        debug!("deleted ship {id}");
        Ok(())
    }

    /// Ships matching `predicate`; a page request is handed to the store as is.
    pub fn list(&self, predicate: &ShipPredicate, page: Option<PageRequest>) -> Result<Vec<Ship>> {
        self.repository.find_all(predicate, page)
    }

    /// Number of ships matching `predicate`.
    pub fn count(&self, predicate: &ShipPredicate) -> Result<u64> {
        self.repository.count(predicate)
    }
}

fn normalize(mut draft: ShipDraft) -> ShipDraft {
    draft.speed = draft.speed.map(round2);
    draft
}
