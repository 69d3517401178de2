//! Dominant-category resolution and the denormalized cache write-back.

use std::collections::BTreeMap;

use flourish_analytics_models::{DominantCategory, LargestCategoryAggregate};
use flourish_database::queries;
use flourish_database_models::TenantRow;
use flourish_geo::radius::locations_within_radius;
use switchy_database::Database;

use crate::{AnalyticsError, distribution::category_distribution, round1};

/// Derives the dominant category from a tenant roster.
///
/// Ties on the highest count resolve to the lexically first category name
/// — arbitrary but stable, so repeated runs agree. Returns `None` for an
/// empty roster.
#[must_use]
pub fn dominant_from_tenants(tenants: &[TenantRow]) -> Option<DominantCategory> {
    // The distribution is ordered count-descending with lexical
    // tie-break, so the head is the winner.
    category_distribution(tenants)
        .into_iter()
        .next()
        .map(|share| DominantCategory {
            category: share.category,
            percent: share.percentage,
        })
}

/// Computes the dominant category for one location's own tenant roster
/// (not a radius-expanded set).
///
/// # Errors
///
/// * [`AnalyticsError::NotFound`] if the location does not exist.
/// * [`AnalyticsError::Database`] if a store query fails.
pub async fn dominant_category(
    db: &dyn Database,
    location_id: &str,
) -> Result<Option<DominantCategory>, AnalyticsError> {
    let location = queries::get_location(db, location_id)
        .await?
        .ok_or_else(|| AnalyticsError::NotFound {
            location_id: location_id.to_string(),
        })?;

    let tenants = queries::get_tenants_for_location(db, &location.id).await?;
    Ok(dominant_from_tenants(&tenants))
}

fn cache_is_current(
    stored_category: Option<&str>,
    stored_percent: Option<f64>,
    computed: Option<&DominantCategory>,
) -> bool {
    match computed {
        None => stored_category.is_none() && stored_percent.is_none(),
        Some(dominant) => {
            stored_category == Some(dominant.category.as_str())
                && stored_percent == Some(dominant.percent)
        }
    }
}

/// Computes the dominant category and writes it back onto the location's
/// denormalized `largest_category` / `largest_category_percent` fields.
///
/// The write is idempotent: when the stored cache already matches the
/// computed value, no UPDATE is issued. A roster that has become empty
/// clears the cache — the cache is strictly a recomputable function of
/// the roster, never a source of truth.
///
/// # Errors
///
/// * [`AnalyticsError::NotFound`] if the location does not exist.
/// * [`AnalyticsError::Database`] if a store operation fails.
pub async fn resolve_and_persist(
    db: &dyn Database,
    location_id: &str,
) -> Result<Option<DominantCategory>, AnalyticsError> {
    let location = queries::get_location(db, location_id)
        .await?
        .ok_or_else(|| AnalyticsError::NotFound {
            location_id: location_id.to_string(),
        })?;

    let tenants = queries::get_tenants_for_location(db, &location.id).await?;
    let dominant = dominant_from_tenants(&tenants);

    if cache_is_current(
        location.largest_category.as_deref(),
        location.largest_category_percent,
        dominant.as_ref(),
    ) {
        log::debug!("Dominant category cache already current for {location_id}, skipping write");
        return Ok(dominant);
    }

    queries::update_largest_category(
        db,
        &location.id,
        dominant.as_ref().map(|d| d.category.as_str()),
        dominant.as_ref().map(|d| d.percent),
    )
    .await?;

    Ok(dominant)
}

/// Groups the locations within `radius_km` of the centre by their cached
/// dominant category.
///
/// Reports, per category, how many in-radius locations have it as their
/// largest and the mean of their cached percentages. Locations with no
/// cached dominant category are skipped. Ordered by location count
/// descending, then category name.
///
/// # Errors
///
/// Propagates the radius-search errors ([`AnalyticsError::NotFound`],
/// [`AnalyticsError::InvalidArgument`], [`AnalyticsError::Database`]).
pub async fn largest_category_aggregation_within_radius(
    db: &dyn Database,
    location_id: &str,
    radius_km: f64,
) -> Result<Vec<LargestCategoryAggregate>, AnalyticsError> {
    let nearby = locations_within_radius(db, location_id, radius_km).await?;

    struct Entry {
        locations: u64,
        percent_sum: f64,
        percent_count: u64,
    }

    let mut by_category: BTreeMap<String, Entry> = BTreeMap::new();
    for near in nearby {
        let Some(category) = near
            .location
            .largest_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            continue;
        };

        let entry = by_category.entry(category.to_string()).or_insert(Entry {
            locations: 0,
            percent_sum: 0.0,
            percent_count: 0,
        });
        entry.locations += 1;
        if let Some(percent) = near.location.largest_category_percent {
            entry.percent_sum += percent;
            entry.percent_count += 1;
        }
    }

    let mut aggregates: Vec<LargestCategoryAggregate> = by_category
        .into_iter()
        .map(|(largest_category, entry)| {
            #[allow(clippy::cast_precision_loss)]
            let avg_percent = if entry.percent_count == 0 {
                0.0
            } else {
                round1(entry.percent_sum / entry.percent_count as f64)
            };
            LargestCategoryAggregate {
                largest_category,
                locations: entry.locations,
                avg_percent,
            }
        })
        .collect();

    aggregates.sort_by(|a, b| b.locations.cmp(&a.locations));

    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchy_database_connection::init_sqlite_rusqlite;

    fn tenant(id: &str, category: Option<&str>) -> TenantRow {
        TenantRow {
            id: id.to_string(),
            location_id: "loc-1".to_string(),
            name: format!("Tenant {id}"),
            category: category.map(ToString::to_string),
            subcategory: None,
            is_anchor_tenant: false,
        }
    }

    async fn test_db() -> Box<dyn Database> {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        flourish_database::run_migrations(db.as_ref())
            .await
            .expect("migrations");
        db
    }

    #[test]
    fn picks_the_largest_share() {
        let tenants = vec![
            tenant("a", Some("Fashion")),
            tenant("b", Some("Fashion")),
            tenant("c", Some("Food")),
        ];

        let dominant = dominant_from_tenants(&tenants).unwrap();
        assert_eq!(dominant.category, "Fashion");
        assert_eq!(dominant.percent, 66.7);
    }

    #[test]
    fn exact_ties_resolve_lexically() {
        let tenants = vec![tenant("a", Some("Food")), tenant("b", Some("Apparel"))];

        let dominant = dominant_from_tenants(&tenants).unwrap();
        assert_eq!(dominant.category, "Apparel");
        assert_eq!(dominant.percent, 50.0);
    }

    #[test]
    fn empty_roster_has_no_dominant_category() {
        assert!(dominant_from_tenants(&[]).is_none());
    }

    #[test]
    fn cache_currency_check_compares_both_fields() {
        let dominant = DominantCategory {
            category: "Fashion".to_string(),
            percent: 66.7,
        };

        assert!(cache_is_current(Some("Fashion"), Some(66.7), Some(&dominant)));
        assert!(!cache_is_current(Some("Fashion"), Some(50.0), Some(&dominant)));
        assert!(!cache_is_current(Some("Food"), Some(66.7), Some(&dominant)));
        assert!(!cache_is_current(None, None, Some(&dominant)));
        assert!(cache_is_current(None, None, None));
        assert!(!cache_is_current(Some("Fashion"), Some(66.7), None));
    }

    #[tokio::test]
    async fn persisted_write_is_idempotent() {
        let db = test_db().await;
        db.exec_raw(
            "INSERT INTO locations (id, name, location_type, latitude, longitude, is_managed)
             VALUES ('loc-1', 'Queensgate', 'SHOPPING_CENTRE', 52.5736, -0.2478, TRUE)",
        )
        .await
        .unwrap();
        db.exec_raw(
            "INSERT INTO tenants (id, location_id, name, category, is_anchor_tenant) VALUES
             ('t1', 'loc-1', 'Next', 'Fashion', FALSE),
             ('t2', 'loc-1', 'River Island', 'Fashion', FALSE),
             ('t3', 'loc-1', 'Greggs', 'Food', FALSE)",
        )
        .await
        .unwrap();

        let first = resolve_and_persist(db.as_ref(), "loc-1").await.unwrap();
        let second = resolve_and_persist(db.as_ref(), "loc-1").await.unwrap();
        assert_eq!(first, second);

        let stored = queries::get_location(db.as_ref(), "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.largest_category.as_deref(), Some("Fashion"));
        assert_eq!(stored.largest_category_percent, Some(66.7));
    }

    #[tokio::test]
    async fn emptied_roster_clears_the_cache() {
        let db = test_db().await;
        db.exec_raw(
            "INSERT INTO locations (id, name, location_type, largest_category,
                                    largest_category_percent, is_managed)
             VALUES ('loc-1', 'Queensgate', 'SHOPPING_CENTRE', 'Fashion', 66.7, TRUE)",
        )
        .await
        .unwrap();

        let dominant = resolve_and_persist(db.as_ref(), "loc-1").await.unwrap();
        assert!(dominant.is_none());

        let stored = queries::get_location(db.as_ref(), "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.largest_category.is_none());
        assert!(stored.largest_category_percent.is_none());
    }

    #[tokio::test]
    async fn aggregates_cached_dominants_in_radius() {
        let db = test_db().await;
        db.exec_raw(
            "INSERT INTO locations (id, name, location_type, latitude, longitude,
                                    largest_category, largest_category_percent, is_managed) VALUES
             ('center', 'Centre', 'SHOPPING_CENTRE', 51.4895, 0.1840, 'Food & Grocery', 40.0, FALSE),
             ('a', 'A', 'RETAIL_PARK', 51.4850, 0.1500, 'Clothing & Footwear', 50.0, FALSE),
             ('b', 'B', 'SHOPPING_CENTRE', 51.4900, 0.1700, 'Clothing & Footwear', 30.0, FALSE),
             ('c', 'C', 'RETAIL_PARK', 51.4920, 0.1900, 'Cafes & Restaurants', 25.0, FALSE),
             ('d', 'D', 'RETAIL_PARK', 51.4910, 0.1850, NULL, NULL, FALSE)",
        )
        .await
        .unwrap();

        let aggregates =
            largest_category_aggregation_within_radius(db.as_ref(), "center", 5.0)
                .await
                .unwrap();

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].largest_category, "Clothing & Footwear");
        assert_eq!(aggregates[0].locations, 2);
        assert_eq!(aggregates[0].avg_percent, 40.0);
        assert_eq!(aggregates[1].largest_category, "Cafes & Restaurants");
        assert_eq!(aggregates[1].locations, 1);
    }
}
