//! Field-level enrichment gap analysis over the whole dataset.

use flourish_analytics_models::{FieldGapCount, GapField, GapSummary};
use flourish_database_models::LocationRow;
use switchy_database::Database;

use crate::{AnalyticsError, round1};

/// Builds the completeness summary for a location snapshot.
///
/// Fields are ordered worst completeness first so the enrichment
/// dashboard leads with the biggest gaps; ties order by display name.
#[must_use]
pub fn summarize(locations: &[LocationRow]) -> GapSummary {
    let total = locations.len() as u64;

    let mut fields: Vec<FieldGapCount> = GapField::all()
        .iter()
        .map(|&field| {
            let missing = locations
                .iter()
                .filter(|loc| field.is_missing(loc))
                .count() as u64;
            #[allow(clippy::cast_precision_loss)]
            let percent_complete = if total == 0 {
                100.0
            } else {
                round1((total - missing) as f64 / total as f64 * 100.0)
            };
            FieldGapCount {
                field,
                display_name: field.display_name().to_string(),
                missing,
                total,
                percent_complete,
            }
        })
        .collect();

    fields.sort_by(|a, b| {
        a.percent_complete
            .total_cmp(&b.percent_complete)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });

    GapSummary {
        total_locations: total,
        fields,
    }
}

/// Ranks the locations missing `field` by remediation priority: store
/// count descending, then floor area descending, ties broken by name
/// ascending — repeated calls return a stable order.
#[must_use]
pub fn rank_missing(locations: &[LocationRow], field: GapField, limit: usize) -> Vec<LocationRow> {
    let mut missing: Vec<&LocationRow> = locations
        .iter()
        .filter(|loc| field.is_missing(loc))
        .collect();

    missing.sort_by(|a, b| {
        b.number_of_stores
            .unwrap_or(0)
            .cmp(&a.number_of_stores.unwrap_or(0))
            .then_with(|| {
                b.total_floor_area
                    .unwrap_or(0.0)
                    .total_cmp(&a.total_floor_area.unwrap_or(0.0))
            })
            .then_with(|| a.name.cmp(&b.name))
    });

    missing.into_iter().take(limit).cloned().collect()
}

/// Scans the full dataset and reports, per tracked field, how many
/// locations are missing it.
///
/// # Errors
///
/// Returns [`AnalyticsError::Database`] if the store query fails — a
/// fetch failure is never reported as "zero gaps".
pub async fn gap_analysis(db: &dyn Database) -> Result<GapSummary, AnalyticsError> {
    let locations = flourish_database::queries::get_all_locations(db).await?;
    Ok(summarize(&locations))
}

/// Returns up to `limit` locations missing the given field, ranked by
/// remediation priority.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidArgument`] if `limit` is zero.
/// * [`AnalyticsError::Database`] if the store query fails.
pub async fn locations_missing_field(
    db: &dyn Database,
    field: GapField,
    limit: usize,
) -> Result<Vec<LocationRow>, AnalyticsError> {
    if limit == 0 {
        return Err(AnalyticsError::InvalidArgument {
            message: "limit must be a positive integer".to_string(),
        });
    }

    let locations = flourish_database::queries::get_all_locations(db).await?;
    Ok(rank_missing(&locations, field, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flourish_retail_models::LocationType;
    use switchy_database_connection::init_sqlite_rusqlite;

    fn location(id: &str, name: &str) -> LocationRow {
        LocationRow {
            id: id.to_string(),
            name: name.to_string(),
            location_type: LocationType::ShoppingCentre,
            address: None,
            city: None,
            county: None,
            postcode: None,
            latitude: None,
            longitude: None,
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
    fn ranks_by_store_count_then_floor_area_then_name() {
        let mut big = location("big", "Big Centre");
        big.number_of_stores = Some(120);
        let mut mid_a = location("mid-a", "Alpha Park");
        mid_a.number_of_stores = Some(40);
        mid_a.total_floor_area = Some(250_000.0);
        let mut mid_b = location("mid-b", "Beta Park");
        mid_b.number_of_stores = Some(40);
        mid_b.total_floor_area = Some(90_000.0);
        let tie_a = location("tie-a", "Arcade");
        let tie_b = location("tie-b", "Bazaar");

        let locations = vec![tie_b, mid_b, big, tie_a, mid_a];
        let ranked = rank_missing(&locations, GapField::Website, 10);

        let ids: Vec<&str> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["big", "mid-a", "mid-b", "tie-a", "tie-b"]);
    }

    #[test]
    fn limit_bounds_the_result() {
        let locations: Vec<LocationRow> = (0..25)
            .map(|i| location(&format!("loc-{i}"), &format!("Centre {i:02}")))
            .collect();

        assert_eq!(rank_missing(&locations, GapField::Website, 10).len(), 10);
    }

    #[test]
    fn never_returns_a_location_with_the_field_populated() {
        let mut with_site = location("a", "Has Website");
        with_site.website = Some("https://example.com".to_string());
        let mut blank_site = location("b", "Blank Website");
        blank_site.website = Some("   ".to_string());
        let without = location("c", "No Website");

        let locations = vec![with_site, blank_site, without];
        let ranked = rank_missing(&locations, GapField::Website, 10);

        let ids: Vec<&str> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn summary_counts_sentinels_as_missing() {
        let mut sentinel_coords = location("a", "Sentinel");
        sentinel_coords.latitude = Some(0.0);
        sentinel_coords.longitude = Some(0.0);
        sentinel_coords.postcode = Some("UNKNOWN".to_string());
        let mut complete = location("b", "Complete");
        complete.latitude = Some(51.5);
        complete.longitude = Some(-0.1);
        complete.postcode = Some("SE1 9SG".to_string());

        let summary = summarize(&[sentinel_coords, complete]);

        let coords = summary
            .fields
            .iter()
            .find(|f| f.field == GapField::Coordinates)
            .unwrap();
        assert_eq!(coords.missing, 1);
        let postcode = summary
            .fields
            .iter()
            .find(|f| f.field == GapField::Postcode)
            .unwrap();
        assert_eq!(postcode.missing, 1);
    }

    #[test]
    fn empty_dataset_summary_is_fully_complete() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_locations, 0);
        assert!(summary.fields.iter().all(|f| f.percent_complete == 100.0));
    }

    #[tokio::test]
    async fn counts_website_gaps_across_the_dataset() {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        flourish_database::run_migrations(db.as_ref())
            .await
            .expect("migrations");

        // 100 locations, 40 without a website.
        let mut sql = String::from(
            "INSERT INTO locations (id, name, location_type, website, is_managed) VALUES ",
        );
        for i in 0..100 {
            if i > 0 {
                sql.push_str(", ");
            }
            let website = if i < 60 {
                format!("'https://centre-{i}.example.com'")
            } else {
                "NULL".to_string()
            };
            sql.push_str(&format!(
                "('loc-{i}', 'Centre {i}', 'SHOPPING_CENTRE', {website}, FALSE)"
            ));
        }
        db.exec_raw(&sql).await.unwrap();

        let summary = gap_analysis(db.as_ref()).await.unwrap();
        assert_eq!(summary.total_locations, 100);
        let website = summary
            .fields
            .iter()
            .find(|f| f.field == GapField::Website)
            .unwrap();
        assert_eq!(website.missing, 40);
        assert_eq!(website.percent_complete, 60.0);
    }

    #[tokio::test]
    async fn zero_limit_is_invalid() {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        flourish_database::run_migrations(db.as_ref())
            .await
            .expect("migrations");

        assert!(matches!(
            locations_missing_field(db.as_ref(), GapField::Website, 0).await,
            Err(AnalyticsError::InvalidArgument { .. })
        ));
    }
}
