#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types for the retail location store.
//!
//! These types represent the shapes of data as retrieved from the
//! `locations` and `tenants` tables. They are distinct from the API
//! response types in `flourish_server_models`, which evolve with the API
//! contract rather than the schema.

use flourish_retail_models::{LocationType, POSTCODE_UNKNOWN};
use serde::{Deserialize, Serialize};

/// A retail location row as retrieved from the database.
///
/// Coordinates of exactly `(0, 0)` are a legacy "unknown" sentinel
/// inherited from the bulk import, not a real position — use
/// [`Self::has_coordinates`] before any distance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    /// Primary key (opaque string id).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Site classification.
    pub location_type: LocationType,
    /// Street address.
    pub address: Option<String>,
    /// City or town.
    pub city: Option<String>,
    /// County.
    pub county: Option<String>,
    /// UK postcode; `"UNKNOWN"` is a sentinel for missing.
    pub postcode: Option<String>,
    /// Latitude (WGS84); `0.0` paired with longitude `0.0` means unset.
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Public website URL.
    pub website: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Opening hours description.
    pub opening_hours: Option<String>,
    /// Number of parking spaces.
    pub parking_spaces: Option<i32>,
    /// Site owner.
    pub owner: Option<String>,
    /// Management company.
    pub management: Option<String>,
    /// Instagram handle or URL.
    pub instagram: Option<String>,
    /// Facebook page URL.
    pub facebook: Option<String>,
    /// Number of stores (units).
    pub number_of_stores: Option<i32>,
    /// Total floor area in square feet.
    pub total_floor_area: Option<f64>,
    /// Denormalized cache of the dominant tenant category.
    pub largest_category: Option<String>,
    /// Denormalized cache of the dominant category share (0-100).
    pub largest_category_percent: Option<f64>,
    /// Whether this is an internally curated (Flourish) site rather than
    /// a bulk-imported one.
    pub is_managed: bool,
}

impl LocationRow {
    /// Returns `true` when both coordinates are present and not the
    /// `(0, 0)` sentinel.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => lat != 0.0 || lon != 0.0,
            _ => false,
        }
    }

    /// Returns `true` when the postcode is present and not the
    /// `"UNKNOWN"` sentinel.
    #[must_use]
    pub fn has_postcode(&self) -> bool {
        self.postcode
            .as_deref()
            .map(str::trim)
            .is_some_and(|p| !p.is_empty() && p != POSTCODE_UNKNOWN)
    }
}

/// A tenant row as retrieved from the database.
///
/// A tenant belongs to exactly one location and is deleted with it
/// (`ON DELETE CASCADE`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRow {
    /// Primary key (opaque string id).
    pub id: String,
    /// Owning location id.
    pub location_id: String,
    /// Trading name.
    pub name: String,
    /// Raw category value; `None` or empty for incompletely enriched
    /// tenants (bucketed as "Uncategorized" by the aggregator).
    pub category: Option<String>,
    /// Optional subcategory.
    pub subcategory: Option<String>,
    /// Whether this is an anchor tenant.
    pub is_anchor_tenant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(lat: Option<f64>, lon: Option<f64>) -> LocationRow {
        LocationRow {
            id: "loc-1".to_string(),
            name: "Queensgate".to_string(),
            location_type: LocationType::ShoppingCentre,
            address: None,
            city: None,
            county: None,
            postcode: None,
            latitude: lat,
            longitude: lon,
            website: None,
            phone: None,
            opening_hours: None,
            parking_spaces: None,
            owner: None,
            management: None,
            instagram: None,
            facebook: None,
            number_of_stores: None,
            total_floor_area: None,
            largest_category: None,
            largest_category_percent: None,
            is_managed: false,
        }
    }

    #[test]
    fn sentinel_origin_is_not_a_coordinate() {
        assert!(!location(Some(0.0), Some(0.0)).has_coordinates());
    }

    #[test]
    fn null_coordinates_are_missing() {
        assert!(!location(None, None).has_coordinates());
        assert!(!location(Some(51.5), None).has_coordinates());
    }

    #[test]
    fn zero_latitude_alone_is_a_valid_coordinate() {
        // A true zero on one axis is real data (the Gulf of Guinea rule
        // only applies to the exact (0,0) pair).
        assert!(location(Some(0.0), Some(0.184)).has_coordinates());
    }

    #[test]
    fn unknown_postcode_sentinel_is_missing() {
        let mut loc = location(None, None);
        loc.postcode = Some("UNKNOWN".to_string());
        assert!(!loc.has_postcode());
        loc.postcode = Some("PE1 1NT".to_string());
        assert!(loc.has_postcode());
    }
}
