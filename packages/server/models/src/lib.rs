#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the retail analytics server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use flourish_analytics_models::{CategoryShare, ComparisonResult, LargestCategoryAggregate, MissingBrand};
use flourish_database_models::LocationRow;
use flourish_retail_models::LocationType;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A retail location as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    /// Unique location id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Site classification.
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// City or town.
    pub city: Option<String>,
    /// County.
    pub county: Option<String>,
    /// Postcode.
    pub postcode: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Public website URL.
    pub website: Option<String>,
    /// Number of stores.
    pub number_of_stores: Option<i32>,
    /// Total floor area in square feet.
    pub total_floor_area: Option<f64>,
    /// Cached dominant tenant category.
    pub largest_category: Option<String>,
    /// Cached dominant category share (0-100).
    pub largest_category_percent: Option<f64>,
    /// Whether this is an internally curated site.
    pub is_managed: bool,
}

impl From<LocationRow> for ApiLocation {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location_type: row.location_type,
            city: row.city,
            county: row.county,
            postcode: row.postcode,
            latitude: row.latitude,
            longitude: row.longitude,
            website: row.website,
            number_of_stores: row.number_of_stores,
            total_floor_area: row.total_floor_area,
            largest_category: row.largest_category,
            largest_category_percent: row.largest_category_percent,
            is_managed: row.is_managed,
        }
    }
}

/// Query parameters for the radius-based analytics endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusQueryParams {
    /// Centre location id.
    pub location_id: Option<String>,
    /// Search radius in kilometres (default 5).
    pub radius_km: Option<f64>,
}

/// Query parameters for the tenant comparison endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQueryParams {
    /// Target location id.
    pub target_id: Option<String>,
    /// Comma-separated competitor location ids.
    pub competitor_ids: Option<String>,
    /// Whether to also report competitor brands absent from the target.
    pub include_brands: Option<bool>,
}

/// Query parameters for the per-field gap listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapListQueryParams {
    /// Maximum number of results (default 100, must be positive).
    pub limit: Option<i64>,
}

/// Envelope for the radius-based analytics responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusResponse<T> {
    /// Centre location id echoed back.
    pub location_id: String,
    /// Radius actually used, in kilometres.
    pub radius_km: f64,
    /// The analytics payload.
    pub data: T,
}

/// Category distribution payload.
pub type ApiCategoryDistribution = RadiusResponse<Vec<CategoryShare>>;

/// Largest-category aggregation payload.
pub type ApiLargestCategoryAggregation = RadiusResponse<Vec<LargestCategoryAggregate>>;

/// Envelope for the tenant comparison response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiComparison {
    /// Always `true` on the success path.
    pub success: bool,
    /// The comparison payload.
    pub data: ComparisonResult,
    /// Missing-brand report, present when `includeBrands=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_brands: Option<Vec<MissingBrand>>,
}
