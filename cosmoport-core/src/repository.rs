//! Persistence abstraction for ships.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{NewShip, Ship};
use crate::error::{Result, ShipError};
use crate::filter::ShipPredicate;
use crate::page::{PageRequest, ShipOrder};

/// Capabilities the registry needs from a ship store.
///
/// Each call is atomic: it either takes full effect or leaves the store as
/// it was.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRepository {
    /// Whether a ship with `id` exists.
    fn exists_by_id(&self, id: i64) -> Result<bool>;
    /// Fetch a ship by identifier.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Store a new ship, assigning its identifier.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship by identifier.
    fn delete_by_id(&self, id: i64) -> Result<()>;
    /// Ships matching `predicate`, optionally sorted and paged.
    fn find_all(&self, predicate: &ShipPredicate, page: Option<PageRequest>) -> Result<Vec<Ship>>;
    /// Number of ships matching `predicate`.
    fn count(&self, predicate: &ShipPredicate) -> Result<u64>;
}

impl<R: ShipRepository + ?Sized> ShipRepository for Arc<R> {
    fn exists_by_id(&self, id: i64) -> Result<bool> {
        (**self).exists_by_id(id)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self, predicate: &ShipPredicate, page: Option<PageRequest>) -> Result<Vec<Ship>> {
        (**self).find_all(predicate, page)
    }

    fn count(&self, predicate: &ShipPredicate) -> Result<u64> {
        (**self).count(predicate)
    }
}

/// Ordering used by stores for a sorted listing.
pub fn compare_ships(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    let primary = match order {
        ShipOrder::Id => left.id.cmp(&right.id),
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
    };
    primary.then_with(|| left.id.cmp(&right.id))
}

#[derive(Debug, Default)]
struct MemoryState {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

/// In-process store backed by a `BTreeMap`.
///
/// Identifiers are assigned sequentially starting at 1.
#[derive(Debug, Default)]
pub struct MemoryShipRepository {
    state: RwLock<MemoryState>,
}

impl MemoryShipRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `ships`, keeping their identifiers.
    pub fn with_ships(ships: impl IntoIterator<Item = Ship>) -> Self {
        let mut state = MemoryState::default();
        for ship in ships {
            state.last_id = state.last_id.max(ship.id);
            state.ships.insert(ship.id, ship);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| ShipError::storage("ship store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| ShipError::storage("ship store lock poisoned"))
    }
}

impl ShipRepository for MemoryShipRepository {
    fn exists_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.read()?.ships.contains_key(&id))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        Ok(self.read()?.ships.get(&id).cloned())
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut state = self.write()?;
        state.last_id += 1;
        let stored = ship.with_id(state.last_id);
        state.ships.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut state = self.write()?;
        match state.ships.get_mut(&ship.id) {
            Some(existing) => {
                *existing = ship.clone();
                Ok(ship.clone())
            }
            None => Err(ShipError::not_found("Ship not found")),
        }
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        self.write()?.ships.remove(&id);
        Ok(())
    }

    fn find_all(&self, predicate: &ShipPredicate, page: Option<PageRequest>) -> Result<Vec<Ship>> {
        let state = self.read()?;
        let mut ships: Vec<Ship> = state
            .ships
            .values()
            .filter(|ship| predicate.matches(ship))
            .cloned()
            .collect();
        let Some(page) = page else {
            return Ok(ships);
        };
        ships.sort_by(|left, right| compare_ships(page.order, left, right));
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(ships
            .into_iter()
            .skip(offset)
            .take(page.page_size as usize)
            .collect())
    }

    fn count(&self, predicate: &ShipPredicate) -> Result<u64> {
        let state = self.read()?;
        Ok(state.ships.values().filter(|ship| predicate.matches(ship)).count() as u64)
    }
}
