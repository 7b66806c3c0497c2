#![deny(missing_docs)]
//! Cosmoport core library.
//!
//! Domain types, validation, rating, and filter composition for the ship
//! registry, plus the service that ties them to a pluggable store.

pub mod domain;
pub mod error;
pub mod filter;
pub mod page;
pub mod rating;
pub mod repository;
pub mod rules;
pub mod service;
pub mod validator;

pub use domain::{NewShip, Ship, ShipDraft, ShipType, start_of_year};
pub use error::{Result, ShipError};
pub use filter::{Criterion, Range, ShipFilter, ShipPredicate};
pub use page::{DEFAULT_PAGE_SIZE, PageRequest, ShipOrder};
pub use rating::{rating, round2};
pub use repository::{MemoryShipRepository, ShipRepository, compare_ships};
pub use rules::ShipRules;
pub use service::{ShipService, parse_id};
pub use validator::{require_complete, validate_present};
