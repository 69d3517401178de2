#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle distance and radius search over retail locations.
//!
//! Distance uses the haversine formula on a spherical-earth approximation.
//! The radius search is a naive full scan with a per-row distance
//! computation — fine at the scale of a few thousand locations, and
//! isolated behind [`radius::locations_within_radius`] so a spatial index
//! could replace it without touching callers.

pub mod radius;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` for the `(0, 0)` "coordinates unknown" sentinel.
    ///
    /// The exact origin sits in the Gulf of Guinea and never occurs as a
    /// real site position in this dataset; it is how the bulk import marks
    /// ungeocodeable records.
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// Error returned when a coordinate contains a non-finite component.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid coordinate ({latitude}, {longitude}): components must be finite")]
pub struct InvalidCoordinateError {
    /// The offending latitude.
    pub latitude: f64,
    /// The offending longitude.
    pub longitude: f64,
}

/// Errors that can occur during geospatial operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Malformed or out-of-domain input (bad radius, non-finite value).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what was rejected.
        message: String,
    },

    /// The referenced location does not exist or cannot anchor a radius
    /// search because its coordinates are the unset sentinel.
    #[error("Location not found: {location_id}")]
    NotFound {
        /// The id that failed to resolve.
        location_id: String,
    },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] flourish_database::DbError),
}

impl From<InvalidCoordinateError> for GeoError {
    fn from(err: InvalidCoordinateError) -> Self {
        Self::InvalidArgument {
            message: err.to_string(),
        }
    }
}

/// Computes the great-circle distance between two coordinates in
/// kilometres using the haversine formula.
///
/// Assumes both inputs are real positions — callers must reject the
/// `(0, 0)` sentinel before invoking this.
///
/// # Errors
///
/// Returns [`InvalidCoordinateError`] if any component is non-finite.
pub fn distance_km(a: Coordinate, b: Coordinate) -> Result<f64, InvalidCoordinateError> {
    for c in [a, b] {
        if !c.latitude.is_finite() || !c.longitude.is_finite() {
            return Err(InvalidCoordinateError {
                latitude: c.latitude,
                longitude: c.longitude,
            });
        }
    }

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUEWATER: Coordinate = Coordinate::new(51.4895, 0.1840);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_km(BLUEWATER, BLUEWATER).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let other = Coordinate::new(51.6000, 0.5000);
        let ab = distance_km(BLUEWATER, other).unwrap();
        let ba = distance_km(other, BLUEWATER).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn nearby_site_is_about_two_km_away() {
        let near = Coordinate::new(51.4850, 0.1500);
        let d = distance_km(BLUEWATER, near).unwrap();
        assert!(d > 2.0 && d < 3.0, "expected ~2.4 km, got {d}");
    }

    #[test]
    fn distant_site_is_about_twenty_five_km_away() {
        let far = Coordinate::new(51.6000, 0.5000);
        let d = distance_km(BLUEWATER, far).unwrap();
        assert!(d > 20.0 && d < 30.0, "expected ~25 km, got {d}");
    }

    #[test]
    fn rejects_non_finite_components() {
        let bad = Coordinate::new(f64::NAN, 0.1);
        assert!(distance_km(BLUEWATER, bad).is_err());
        let inf = Coordinate::new(51.0, f64::INFINITY);
        assert!(distance_km(inf, BLUEWATER).is_err());
    }

    #[test]
    fn origin_is_the_sentinel() {
        assert!(Coordinate::new(0.0, 0.0).is_sentinel());
        assert!(!Coordinate::new(0.0, 0.184).is_sentinel());
        assert!(!BLUEWATER.is_sentinel());
    }
}
