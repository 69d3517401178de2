//! Radius search over the location dataset.

use flourish_database::queries;
use flourish_database_models::LocationRow;
use switchy_database::Database;

use crate::{Coordinate, GeoError, distance_km};

/// A location matched by a radius search, with its computed distance from
/// the centre.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyLocation {
    /// The matched location.
    pub location: LocationRow,
    /// Great-circle distance from the centre in kilometres.
    pub distance_km: f64,
}

fn coordinate_of(location: &LocationRow) -> Option<Coordinate> {
    if !location.has_coordinates() {
        return None;
    }
    Some(Coordinate::new(
        location.latitude.unwrap_or_default(),
        location.longitude.unwrap_or_default(),
    ))
}

/// Returns every location within `radius_km` of the given centre location,
/// excluding the centre itself.
///
/// Candidates with sentinel or missing coordinates are filtered out before
/// the distance comparison — they can never genuinely fall inside a radius
/// and must not be counted as "near". Result order is unspecified; callers
/// needing ranked output sort by [`NearbyLocation::distance_km`].
///
/// # Errors
///
/// * [`GeoError::NotFound`] if the centre does not exist or has sentinel
///   coordinates (it cannot anchor a radius search).
/// * [`GeoError::InvalidArgument`] if `radius_km` is negative or
///   non-finite.
/// * [`GeoError::Database`] if the store query fails.
pub async fn locations_within_radius(
    db: &dyn Database,
    center_id: &str,
    radius_km: f64,
) -> Result<Vec<NearbyLocation>, GeoError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(GeoError::InvalidArgument {
            message: format!("radiusKm must be a finite non-negative number, got {radius_km}"),
        });
    }

    let center = queries::get_location(db, center_id)
        .await?
        .ok_or_else(|| GeoError::NotFound {
            location_id: center_id.to_string(),
        })?;
    let center_coord = coordinate_of(&center).ok_or_else(|| GeoError::NotFound {
        location_id: center_id.to_string(),
    })?;

    // Naive full scan. At a few thousand rows this beats maintaining a
    // spatial index; the contract stays the same if that ever changes.
    let all = queries::get_all_locations(db).await?;

    let mut matches = Vec::new();
    for location in all {
        if location.id == center.id {
            continue;
        }
        let Some(coord) = coordinate_of(&location) else {
            continue;
        };
        let distance = match distance_km(center_coord, coord) {
            Ok(d) => d,
            Err(e) => {
                // Corrupt row; skip it rather than failing the scan.
                log::warn!("Skipping location {} in radius scan: {e}", location.id);
                continue;
            }
        };
        if distance <= radius_km {
            matches.push(NearbyLocation {
                location,
                distance_km: distance,
            });
        }
    }

    Ok(matches)
}
