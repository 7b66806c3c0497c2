//! PostgreSQL-backed ship store.

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use cosmoport_core::{
    Criterion, NewShip, PageRequest, Result, Ship, ShipError, ShipOrder, ShipPredicate,
    ShipRepository,
};

use crate::db::DbPool;
use crate::models::{ShipRecord, ShipRow};
use crate::schema::ships;

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

/// Ship store using a pooled Diesel connection per call.
#[derive(Clone)]
pub struct PgShipRepository {
    pool: DbPool,
}

impl PgShipRepository {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PgPooled> {
        self.pool.get().map_err(storage)
    }
}

fn storage(err: impl std::fmt::Display) -> ShipError {
    log::warn!("ship store failure: {err}");
    ShipError::storage(err)
}

/// Escape LIKE wildcards so the fragment matches literally.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Translate a predicate into a boxed `SELECT` with one `WHERE` term per bound.
fn filtered(predicate: &ShipPredicate) -> ships::BoxedQuery<'static, Pg> {
    let mut query = ships::table.into_boxed();
    for criterion in predicate.criteria() {
        query = match criterion {
            Criterion::NameContains(fragment) => {
                query.filter(ships::name.like(contains_pattern(fragment)).escape('\\'))
            }
            Criterion::PlanetContains(fragment) => {
                query.filter(ships::planet.like(contains_pattern(fragment)).escape('\\'))
            }
            Criterion::ShipTypeIs(ship_type) => {
                query.filter(ships::ship_type.eq(ship_type.as_str()))
            }
            Criterion::ProdDate(range) => {
                if let Some(after) = range.min {
                    query = query.filter(ships::prod_date.ge(after.naive_utc()));
                }
                if let Some(before) = range.max {
                    query = query.filter(ships::prod_date.le(before.naive_utc()));
                }
                query
            }
            Criterion::Usage(is_used) => query.filter(ships::is_used.eq(*is_used)),
            Criterion::Speed(range) => {
                if let Some(min) = range.min {
                    query = query.filter(ships::speed.ge(min));
                }
                if let Some(max) = range.max {
                    query = query.filter(ships::speed.le(max));
                }
                query
            }
            Criterion::CrewSize(range) => {
                if let Some(min) = range.min {
                    query = query.filter(ships::crew_size.ge(min));
                }
                if let Some(max) = range.max {
                    query = query.filter(ships::crew_size.le(max));
                }
                query
            }
            Criterion::Rating(range) => {
                if let Some(min) = range.min {
                    query = query.filter(ships::rating.ge(min));
                }
                if let Some(max) = range.max {
                    query = query.filter(ships::rating.le(max));
                }
                query
            }
        };
    }
    query
}

fn paged(
    query: ships::BoxedQuery<'static, Pg>,
    page: PageRequest,
) -> ships::BoxedQuery<'static, Pg> {
    let query = match page.order {
        ShipOrder::Id => query.order(ships::id.asc()),
        ShipOrder::Speed => query.order((ships::speed.asc(), ships::id.asc())),
        ShipOrder::Date => query.order((ships::prod_date.asc(), ships::id.asc())),
        ShipOrder::Rating => query.order((ships::rating.asc(), ships::id.asc())),
    };
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    query.limit(i64::from(page.page_size)).offset(offset)
}

impl ShipRepository for PgShipRepository {
    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(ships::table.find(id)))
            .get_result(&mut conn)
            .map_err(storage)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(storage)?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(ShipRow::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .map_err(storage)?;
        Ship::try_from(record)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::update(ships::table.find(ship.id))
            .set(ShipRow::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(storage)?
            .ok_or_else(|| ShipError::not_found("Ship not found"))?;
        Ship::try_from(record)
    }

    fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(storage)?;
        Ok(())
    }

    fn find_all(&self, predicate: &ShipPredicate, page: Option<PageRequest>) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let query = match page {
            Some(page) => paged(filtered(predicate), page),
            None => filtered(predicate).order(ships::id.asc()),
        };
        query
            .load::<ShipRecord>(&mut conn)
            .map_err(storage)?
            .into_iter()
            .map(Ship::try_from)
            .collect()
    }

    fn count(&self, predicate: &ShipPredicate) -> Result<u64> {
        let mut conn = self.conn()?;
        let total: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .map_err(storage)?;
        u64::try_from(total).map_err(storage)
    }
}
