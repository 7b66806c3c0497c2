//! Field and completeness checks for inbound ship payloads.

use chrono::Datelike;

use crate::domain::ShipDraft;
use crate::error::{Result, ShipError};
use crate::rules::ShipRules;

/// Reject a draft that lacks any field required to create a ship.
///
/// `is_used` is optional; it defaults to `false` on creation.
pub fn require_complete(draft: &ShipDraft) -> Result<()> {
    let missing = [
        ("name", draft.name.is_none()),
        ("planet", draft.planet.is_none()),
        ("shipType", draft.ship_type.is_none()),
        ("prodDate", draft.prod_date.is_none()),
        ("speed", draft.speed.is_none()),
        ("crewSize", draft.crew_size.is_none()),
    ]
    .into_iter()
    .find_map(|(field, absent)| absent.then_some(field));

    match missing {
        Some(field) => Err(ShipError::bad_request(format!(
            "One of Ship params is null: {field}"
        ))),
        None => Ok(()),
    }
}

/// Check every field present in `draft` against `rules`.
///
/// Absent fields are skipped, so the same check serves full creation and
/// partial edits. The production year is read in UTC.
pub fn validate_present(draft: &ShipDraft, rules: &ShipRules) -> Result<()> {
    if let Some(name) = &draft.name {
        check_text("name", name, rules)?;
    }
    if let Some(planet) = &draft.planet {
        check_text("planet", planet, rules)?;
    }
    if let Some(crew_size) = draft.crew_size {
        if crew_size < rules.min_crew_size || crew_size > rules.max_crew_size {
            return Err(incorrect("crewSize"));
        }
    }
    if let Some(speed) = draft.speed {
        if !(speed >= rules.min_speed && speed <= rules.max_speed) {
            return Err(incorrect("speed"));
        }
    }
    if let Some(prod_date) = draft.prod_date {
        let year = prod_date.year();
        if year < rules.min_prod_year || year > rules.max_prod_year {
            return Err(incorrect("prodDate"));
        }
    }
    Ok(())
}

fn check_text(field: &str, value: &str, rules: &ShipRules) -> Result<()> {
    let length = value.chars().count();
    if length < 1 || length > rules.max_text_length {
        return Err(incorrect(field));
    }
    Ok(())
}

fn incorrect(field: &str) -> ShipError {
    ShipError::bad_request(format!("Incorrect Ship.{field}"))
}
