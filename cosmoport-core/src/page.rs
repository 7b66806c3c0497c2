//! Paging and ordering requests, passed through to the store untouched.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Field a listing is sorted by (ascending, ties broken by id).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Sort by identifier.
    #[default]
    Id,
    /// Sort by speed.
    Speed,
    /// Sort by production date.
    Date,
    /// Sort by rating.
    Rating,
}

impl ShipOrder {
    /// Name of the ship field this order sorts by.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
        }
    }
}

/// A page of a sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page index.
    #[serde(default)]
    pub page_number: u32,
    /// Number of ships per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Sort field.
    #[serde(default)]
    pub order: ShipOrder,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            order: ShipOrder::Id,
        }
    }
}

impl PageRequest {
    /// Number of ships to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}
