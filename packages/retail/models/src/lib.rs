#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Retail location classification and tenant category taxonomy.
//!
//! This crate defines the canonical location type enum and the tenant
//! category taxonomy shared across the whole system. Tenant categories
//! follow the LDC tier-2 naming convention; the taxonomy is open (unknown
//! names survive as-is) but known names are canonicalized so that casing
//! and `&`/`and` drift cannot fragment a category into multiple buckets.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Classification of a physical retail site.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// Enclosed shopping centre.
    ShoppingCentre,
    /// Open-air retail park.
    RetailPark,
    /// Outlet / designer village.
    OutletCentre,
    /// High street cluster.
    HighStreet,
}

impl LocationType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ShoppingCentre,
            Self::RetailPark,
            Self::OutletCentre,
            Self::HighStreet,
        ]
    }
}

/// Bucket name used for tenants with a `NULL` or empty category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Sentinel postcode meaning "postcode unknown" in bulk-imported data.
pub const POSTCODE_UNKNOWN: &str = "UNKNOWN";

/// Canonical LDC tier-2 category names with their importance weight
/// (1-10) used for gap prioritization.
pub const CANONICAL_CATEGORIES: &[(&str, u8)] = &[
    ("Cafes & Restaurants", 10),
    ("Clothing & Footwear", 9),
    ("Health & Beauty", 8),
    ("Food & Grocery", 8),
    ("Leisure & Entertainment", 8),
    ("Electrical & Technology", 7),
    ("Jewellery & Watches", 7),
    ("General Retail", 6),
    ("Home & Garden", 6),
    ("Department Stores", 6),
    ("Gifts & Stationery", 5),
    ("Kids & Toys", 5),
    ("Financial Services", 4),
    ("Services", 4),
    ("Charity & Second Hand", 3),
    ("Vacant", 1),
];

/// Default importance weight for categories outside the canonical set.
pub const DEFAULT_CATEGORY_IMPORTANCE: u8 = 5;

/// Folds a category name into a comparison key: lowercased, whitespace
/// collapsed, `" and "` folded to `" & "`.
fn category_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" and ", " & ")
}

/// Canonicalizes a raw tenant category value into a bucket name.
///
/// Trims whitespace; `None`, empty, or whitespace-only values become
/// [`UNCATEGORIZED`]. Values matching a canonical name (ignoring case and
/// `&`/`and` spelling) are rewritten to the canonical casing. Any other
/// non-empty value passes through trimmed — the taxonomy is maintained by
/// convention, not a closed type.
#[must_use]
pub fn canonicalize_category(raw: Option<&str>) -> String {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNCATEGORIZED.to_string();
    };

    let key = category_key(trimmed);
    for (canonical, _) in CANONICAL_CATEGORIES {
        if category_key(canonical) == key {
            return (*canonical).to_string();
        }
    }

    trimmed.to_string()
}

/// Returns the gap-scoring importance weight for a category name.
#[must_use]
pub fn category_importance(category: &str) -> u8 {
    CANONICAL_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(DEFAULT_CATEGORY_IMPORTANCE, |(_, weight)| *weight)
}
