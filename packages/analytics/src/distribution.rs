//! Category distribution aggregation.

use std::collections::BTreeMap;

use flourish_analytics_models::CategoryShare;
use flourish_database_models::TenantRow;
use flourish_geo::radius::locations_within_radius;
use flourish_retail_models::canonicalize_category;
use switchy_database::Database;

use crate::{AnalyticsError, round1};

/// Buckets a tenant set by canonicalized category name.
///
/// `NULL`/empty categories land in the explicit "Uncategorized" bucket
/// rather than being dropped. An empty tenant set yields an empty
/// distribution — never a division by zero. Buckets are ordered by count
/// descending, then name ascending, so repeated runs emit identical
/// output.
#[must_use]
pub fn category_distribution(tenants: &[TenantRow]) -> Vec<CategoryShare> {
    if tenants.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for tenant in tenants {
        let bucket = canonicalize_category(tenant.category.as_deref());
        *counts.entry(bucket).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let total = tenants.len() as f64;

    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| {
            #[allow(clippy::cast_precision_loss)]
            let percentage = round1(count as f64 / total * 100.0);
            CategoryShare {
                category,
                count,
                percentage,
            }
        })
        .collect();

    // BTreeMap iteration already gave name-ascending order, so a stable
    // sort by count leaves ties lexically ordered.
    shares.sort_by(|a, b| b.count.cmp(&a.count));

    shares
}

/// Distribution of tenant categories across every location within
/// `radius_km` of the given centre (the centre itself excluded, per the
/// radius contract).
///
/// A radius containing locations but no tenants yields an empty
/// distribution; a store failure is an error — the two outcomes are never
/// conflated.
///
/// # Errors
///
/// * [`AnalyticsError::NotFound`] if the centre is missing or has
///   sentinel coordinates.
/// * [`AnalyticsError::InvalidArgument`] for a negative or non-finite
///   radius.
/// * [`AnalyticsError::Database`] if a store query fails.
pub async fn category_distribution_within_radius(
    db: &dyn Database,
    location_id: &str,
    radius_km: f64,
) -> Result<Vec<CategoryShare>, AnalyticsError> {
    let nearby = locations_within_radius(db, location_id, radius_km).await?;
    if nearby.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = nearby.into_iter().map(|n| n.location.id).collect();
    let tenants = flourish_database::queries::get_tenants_for_locations(db, &ids).await?;

    Ok(category_distribution(&tenants))
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

    #[test]
    fn two_fashion_one_food_splits_two_thirds() {
        let tenants = vec![
            tenant("a", Some("Fashion")),
            tenant("b", Some("Fashion")),
            tenant("c", Some("Food")),
        ];

        let shares = category_distribution(&tenants);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, "Fashion");
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].percentage, 66.7);
        assert_eq!(shares[1].category, "Food");
        assert_eq!(shares[1].count, 1);
        assert_eq!(shares[1].percentage, 33.3);
    }

    #[test]
    fn empty_tenant_set_yields_empty_distribution() {
        assert!(category_distribution(&[]).is_empty());
    }

    #[test]
    fn null_and_empty_categories_bucket_as_uncategorized() {
        let tenants = vec![tenant("a", None), tenant("b", Some("  ")), tenant("c", Some("Food"))];

        let shares = category_distribution(&tenants);
        assert_eq!(shares[0].category, "Uncategorized");
        assert_eq!(shares[0].count, 2);
    }

    #[test]
    fn categories_with_case_drift_share_a_bucket() {
        let tenants = vec![
            tenant("a", Some("Food & Grocery")),
            tenant("b", Some("food and grocery")),
        ];

        let shares = category_distribution(&tenants);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].category, "Food & Grocery");
        assert_eq!(shares[0].percentage, 100.0);
    }

    #[test]
    fn rounded_percentages_sum_close_to_one_hundred() {
        let tenants = vec![
            tenant("a", Some("Fashion")),
            tenant("b", Some("Food")),
            tenant("c", Some("Leisure")),
        ];

        let sum: f64 = category_distribution(&tenants)
            .iter()
            .map(|s| s.percentage)
            .sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {sum}");
    }

    #[test]
    fn count_ties_order_lexically() {
        let tenants = vec![tenant("a", Some("Food")), tenant("b", Some("Apparel"))];

        let shares = category_distribution(&tenants);
        assert_eq!(shares[0].category, "Apparel");
        assert_eq!(shares[1].category, "Food");
    }

    #[tokio::test]
    async fn radius_distribution_excludes_center_tenants() {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        flourish_database::run_migrations(db.as_ref())
            .await
            .expect("migrations");

        db.exec_raw(
            "INSERT INTO locations (id, name, location_type, latitude, longitude, is_managed) VALUES
             ('center', 'Centre', 'SHOPPING_CENTRE', 51.4895, 0.1840, FALSE),
             ('near', 'Near', 'RETAIL_PARK', 51.4850, 0.1500, FALSE)",
        )
        .await
        .unwrap();
        db.exec_raw(
            "INSERT INTO tenants (id, location_id, name, category, is_anchor_tenant) VALUES
             ('t1', 'center', 'Centre Cafe', 'Cafes & Restaurants', FALSE),
             ('t2', 'near', 'Boots', 'Health & Beauty', FALSE),
             ('t3', 'near', 'Superdrug', 'Health & Beauty', FALSE)",
        )
        .await
        .unwrap();

        let shares = category_distribution_within_radius(db.as_ref(), "center", 5.0)
            .await
            .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].category, "Health & Beauty");
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].percentage, 100.0);
    }
}
