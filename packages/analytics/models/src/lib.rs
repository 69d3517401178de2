#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Result types for the retail analytics engine.
//!
//! All derived, never persisted (with the single exception of the dominant
//! category, which the resolver caches back onto the location row). JSON
//! serialization is camelCase to match the reporting consumers.

use flourish_database_models::LocationRow;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One bucket of a category distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Canonicalized category name.
    pub category: String,
    /// Tenant count in this bucket.
    pub count: u64,
    /// Share of total tenants, 0-100, rounded to one decimal. The sum over
    /// all buckets may deviate from 100.0 by the rounding error bound.
    pub percentage: f64,
}

/// The single largest tenant category of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantCategory {
    /// Winning category name (lexically first on an exact count tie).
    pub category: String,
    /// Its share of the location's tenants, 0-100, one decimal.
    pub percent: f64,
}

/// Aggregate of stored dominant categories across locations in a radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestCategoryAggregate {
    /// The dominant category shared by these locations.
    pub largest_category: String,
    /// How many in-radius locations have it as their largest.
    pub locations: u64,
    /// Mean of their cached dominant-category percentages.
    pub avg_percent: f64,
}

/// One side of a tenant-mix comparison, with its breakdown expanded to the
/// full unioned category axis (0 count / 0.0% where absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSide {
    /// Location id.
    pub location_id: String,
    /// Location display name.
    pub location_name: String,
    /// Total tenants at this location.
    pub total_tenants: u64,
    /// Full-axis category breakdown, aligned with
    /// [`ComparisonResult::categories`].
    pub shares: Vec<CategoryShare>,
}

/// Competitor set rolled up as one combined tenant pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAggregate {
    /// Number of competitor locations.
    pub total_locations: u64,
    /// Total tenants across all competitors.
    pub total_tenants: u64,
    /// Mean tenants per competitor location.
    pub average_tenants_per_location: f64,
    /// Full-axis breakdown of the combined competitor tenant pool.
    pub shares: Vec<CategoryShare>,
}

/// A category present in the competitor set but absent from the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingCategoryGap {
    /// The absent category.
    pub category: String,
    /// Competitor tenant count in it.
    pub competitor_count: u64,
    /// Competitor share of it, 0-100.
    pub competitor_percentage: f64,
    /// Importance-weighted priority score.
    pub gap_score: f64,
}

/// A category where the target's share sits more than five points above
/// the combined competitor share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverRepresentedGap {
    /// The category.
    pub category: String,
    /// Target tenant count.
    pub target_count: u64,
    /// Target share, 0-100.
    pub target_percentage: f64,
    /// Combined competitor share, 0-100.
    pub competitor_percentage: f64,
    /// Points above the competitor share.
    pub variance: f64,
}

/// A category where the target's share sits more than five points below
/// the combined competitor share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderRepresentedGap {
    /// The category.
    pub category: String,
    /// Target tenant count.
    pub target_count: u64,
    /// Target share, 0-100.
    pub target_percentage: f64,
    /// Combined competitor share, 0-100.
    pub competitor_percentage: f64,
    /// Points below the competitor share (absolute).
    pub variance: f64,
    /// Importance-weighted priority score.
    pub gap_score: f64,
}

/// Tenant-mix gaps between the target and the competitor set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonGaps {
    /// Categories competitors carry that the target lacks, highest gap
    /// score first.
    pub missing_categories: Vec<MissingCategoryGap>,
    /// Categories the target over-indexes on.
    pub over_represented: Vec<OverRepresentedGap>,
    /// Categories the target under-indexes on, highest gap score first.
    pub under_represented: Vec<UnderRepresentedGap>,
}

/// A competitor tenant brand absent from the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingBrand {
    /// Trading name as it appears at the first competitor carrying it.
    pub name: String,
    /// Canonicalized category.
    pub category: String,
    /// Competitor locations carrying this brand.
    pub present_in: Vec<BrandPresence>,
}

/// One competitor location carrying a missing brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPresence {
    /// Location id.
    pub location_id: String,
    /// Location display name.
    pub location_name: String,
}

/// Side-by-side tenant-mix comparison of a target against competitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Unioned category axis, lexically ordered. Every side's `shares`
    /// vector is aligned with this axis.
    pub categories: Vec<String>,
    /// The target location.
    pub target: ComparisonSide,
    /// Each competitor individually.
    pub competitors: Vec<ComparisonSide>,
    /// The competitor set as one combined pool.
    pub competitor_aggregate: CompetitorAggregate,
    /// Gap classification against the combined pool.
    pub gaps: ComparisonGaps,
}

/// A structured location field tracked by the gap analyzer.
///
/// Serialized in camelCase to match the field names the enrichment
/// dashboard uses (`openingHours`, `numberOfStores`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum GapField {
    /// Public website URL.
    Website,
    /// Contact phone number.
    Phone,
    /// Opening hours description.
    OpeningHours,
    /// UK postcode (`"UNKNOWN"` sentinel counts as missing).
    Postcode,
    /// City or town.
    City,
    /// County.
    County,
    /// Coordinate pair (`(0,0)` sentinel counts as missing).
    Coordinates,
    /// Number of parking spaces.
    ParkingSpaces,
    /// Site owner.
    Owner,
    /// Management company.
    Management,
    /// Number of stores.
    NumberOfStores,
    /// Total floor area.
    TotalFloorArea,
    /// Instagram handle.
    Instagram,
    /// Facebook page.
    Facebook,
    /// Denormalized dominant category cache.
    LargestCategory,
}

fn text_missing(value: Option<&str>) -> bool {
    value.map(str::trim).is_none_or(str::is_empty)
}

impl GapField {
    /// Returns all tracked fields.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Website,
            Self::Phone,
            Self::OpeningHours,
            Self::Postcode,
            Self::City,
            Self::County,
            Self::Coordinates,
            Self::ParkingSpaces,
            Self::Owner,
            Self::Management,
            Self::NumberOfStores,
            Self::TotalFloorArea,
            Self::Instagram,
            Self::Facebook,
            Self::LargestCategory,
        ]
    }

    /// Human-readable field name for reporting.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Phone => "Phone Number",
            Self::OpeningHours => "Opening Hours",
            Self::Postcode => "Postcode",
            Self::City => "City",
            Self::County => "County",
            Self::Coordinates => "Coordinates",
            Self::ParkingSpaces => "Parking Spaces",
            Self::Owner => "Owner",
            Self::Management => "Management",
            Self::NumberOfStores => "Number of Stores",
            Self::TotalFloorArea => "Total Floor Area",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::LargestCategory => "Largest Category",
        }
    }

    /// Field-specific emptiness predicate.
    ///
    /// `NULL`, empty/whitespace strings, and the designated sentinels
    /// (postcode `"UNKNOWN"`, coordinates `(0,0)`) all count as missing —
    /// "not null" does not imply "valid".
    #[must_use]
    pub fn is_missing(self, location: &LocationRow) -> bool {
        match self {
            Self::Website => text_missing(location.website.as_deref()),
            Self::Phone => text_missing(location.phone.as_deref()),
            Self::OpeningHours => text_missing(location.opening_hours.as_deref()),
            Self::Postcode => !location.has_postcode(),
            Self::City => text_missing(location.city.as_deref()),
            Self::County => text_missing(location.county.as_deref()),
            Self::Coordinates => !location.has_coordinates(),
            Self::ParkingSpaces => location.parking_spaces.is_none(),
            Self::Owner => text_missing(location.owner.as_deref()),
            Self::Management => text_missing(location.management.as_deref()),
            Self::NumberOfStores => location.number_of_stores.is_none(),
            Self::TotalFloorArea => location.total_floor_area.is_none(),
            Self::Instagram => text_missing(location.instagram.as_deref()),
            Self::Facebook => text_missing(location.facebook.as_deref()),
            Self::LargestCategory => text_missing(location.largest_category.as_deref()),
        }
    }
}

/// Missing-count entry for one field in the gap summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGapCount {
    /// The field.
    pub field: GapField,
    /// Human-readable field name.
    pub display_name: String,
    /// Locations missing this field.
    pub missing: u64,
    /// Locations considered.
    pub total: u64,
    /// Completeness percentage, 0-100, one decimal.
    pub percent_complete: f64,
}

/// Whole-dataset completeness summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSummary {
    /// Total locations in the dataset.
    pub total_locations: u64,
    /// Per-field gaps, worst completeness first.
    pub fields: Vec<FieldGapCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_field_parses_camel_case() {
        assert_eq!(
            "openingHours".parse::<GapField>().unwrap(),
            GapField::OpeningHours
        );
        assert_eq!("website".parse::<GapField>().unwrap(), GapField::Website);
        assert!("not_a_field".parse::<GapField>().is_err());
    }

    #[test]
    fn gap_field_displays_camel_case() {
        assert_eq!(GapField::NumberOfStores.to_string(), "numberOfStores");
    }

    #[test]
    fn whitespace_only_text_is_missing() {
        assert!(text_missing(Some("   ")));
        assert!(text_missing(None));
        assert!(!text_missing(Some("https://example.com")));
    }
}
