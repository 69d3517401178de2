#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geospatial retail analytics and data-completeness engine.
//!
//! Four query families over the location/tenant store: category
//! distributions (optionally radius-expanded), dominant-category
//! resolution with an idempotent cache write-back, target-vs-competitor
//! tenant-mix comparison, and field-level gap analysis. Every operation is
//! a stateless transformation over the current store snapshot; the only
//! write path is the dominant-category cache.

pub mod comparison;
pub mod distribution;
pub mod dominant;
pub mod gaps;

use flourish_geo::GeoError;
use thiserror::Error;

/// Errors that can occur during analytics operations.
///
/// `InvalidArgument` and `NotFound` are deterministic for a given input
/// and surface straight to the caller; `Database` failures are logged at
/// the boundary and surfaced as a generic internal error.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Malformed or out-of-domain input (bad radius, empty competitor
    /// list, non-positive limit).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was rejected.
        message: String,
    },

    /// A referenced location id does not exist, or is unusable as a
    /// radius anchor due to sentinel coordinates.
    #[error("Location not found: {location_id}")]
    NotFound {
        /// The id that failed to resolve.
        location_id: String,
    },

    /// Store or query failure not attributable to caller input.
    #[error("Database error: {0}")]
    Database(#[from] flourish_database::DbError),
}

impl From<GeoError> for AnalyticsError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::InvalidArgument { message } => Self::InvalidArgument { message },
            GeoError::NotFound { location_id } => Self::NotFound { location_id },
            GeoError::Database(e) => Self::Database(e),
        }
    }
}

/// Rounds to one decimal place, half away from zero.
///
/// The shared rounding policy for every percentage this engine emits. A
/// set of rounded shares may sum to slightly off 100.0; that deviation is
/// bounded by the rounding error and accepted.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_one_decimal() {
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(33.333_333), 33.3);
        assert_eq!(round1(2.45), 2.5);
        assert_eq!(round1(100.0), 100.0);
    }
}
