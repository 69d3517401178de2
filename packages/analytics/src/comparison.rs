//! Target-vs-competitor tenant-mix comparison.

use std::collections::{BTreeMap, BTreeSet};

use flourish_analytics_models::{
    BrandPresence, CategoryShare, ComparisonGaps, ComparisonResult, ComparisonSide,
    CompetitorAggregate, MissingBrand, MissingCategoryGap, OverRepresentedGap,
    UnderRepresentedGap,
};
use flourish_database::queries;
use flourish_database_models::{LocationRow, TenantRow};
use flourish_retail_models::canonicalize_category;
use switchy_database::Database;

use crate::{AnalyticsError, distribution::category_distribution, round1};

/// Share-points threshold beyond which a category counts as over- or
/// under-represented.
const REPRESENTATION_THRESHOLD: f64 = 5.0;

/// Importance-weighted priority score for a category gap.
///
/// Blends the category's taxonomy importance, how widely the competitor
/// set carries it, and its share of the combined competitor pool.
fn gap_score(category: &str, competitor_percentage: f64, coverage: f64) -> f64 {
    let importance = f64::from(flourish_retail_models::category_importance(category));
    round1(importance.mul_add(0.4, (coverage * 10.0).mul_add(0.3, competitor_percentage * 0.3)))
}

/// Expands a sparse distribution onto the full category axis, filling
/// absent categories with a zero share.
fn expand_to_axis(axis: &[String], sparse: &[CategoryShare]) -> Vec<CategoryShare> {
    let by_name: BTreeMap<&str, &CategoryShare> =
        sparse.iter().map(|s| (s.category.as_str(), s)).collect();

    axis.iter()
        .map(|category| {
            by_name.get(category.as_str()).map_or_else(
                || CategoryShare {
                    category: category.clone(),
                    count: 0,
                    percentage: 0.0,
                },
                |share| (*share).clone(),
            )
        })
        .collect()
}

fn classify_gaps(
    target: &[CategoryShare],
    combined_competitors: &[CategoryShare],
    competitor_location_count: u64,
) -> ComparisonGaps {
    let target_categories: BTreeSet<&str> =
        target.iter().map(|s| s.category.as_str()).collect();

    #[allow(clippy::cast_precision_loss)]
    let location_count = competitor_location_count as f64;

    let mut missing_categories: Vec<MissingCategoryGap> = combined_competitors
        .iter()
        .filter(|share| !target_categories.contains(share.category.as_str()))
        .map(|share| {
            #[allow(clippy::cast_precision_loss)]
            let coverage = if location_count > 0.0 {
                (share.count as f64 / location_count).min(1.0)
            } else {
                0.0
            };
            MissingCategoryGap {
                category: share.category.clone(),
                competitor_count: share.count,
                competitor_percentage: share.percentage,
                gap_score: gap_score(&share.category, share.percentage, coverage),
            }
        })
        .collect();
    missing_categories.sort_by(|a, b| b.gap_score.total_cmp(&a.gap_score));

    let competitor_by_name: BTreeMap<&str, &CategoryShare> = combined_competitors
        .iter()
        .map(|s| (s.category.as_str(), s))
        .collect();

    let mut over_represented = Vec::new();
    let mut under_represented = Vec::new();

    for share in target {
        let competitor = competitor_by_name.get(share.category.as_str());
        let competitor_percentage = competitor.map_or(0.0, |s| s.percentage);
        let variance = share.percentage - competitor_percentage;

        if variance > REPRESENTATION_THRESHOLD {
            over_represented.push(OverRepresentedGap {
                category: share.category.clone(),
                target_count: share.count,
                target_percentage: share.percentage,
                competitor_percentage,
                variance: round1(variance),
            });
        } else if variance < -REPRESENTATION_THRESHOLD {
            #[allow(clippy::cast_precision_loss)]
            let coverage = if location_count > 0.0 {
                (competitor.map_or(0.0, |s| s.count as f64) / location_count).min(1.0)
            } else {
                0.0
            };
            under_represented.push(UnderRepresentedGap {
                category: share.category.clone(),
                target_count: share.count,
                target_percentage: share.percentage,
                competitor_percentage,
                variance: round1(-variance),
                gap_score: gap_score(&share.category, competitor_percentage, coverage),
            });
        }
    }

    under_represented.sort_by(|a, b| b.gap_score.total_cmp(&a.gap_score));

    ComparisonGaps {
        missing_categories,
        over_represented,
        under_represented,
    }
}

/// Resolves the target and every competitor, failing fast on any id that
/// does not exist (strict variant — a silently dropped competitor would
/// make comparisons nondeterministic across data repairs).
async fn resolve_participants(
    db: &dyn Database,
    target_id: &str,
    competitor_ids: &[String],
) -> Result<(LocationRow, Vec<LocationRow>), AnalyticsError> {
    if competitor_ids.is_empty() {
        return Err(AnalyticsError::InvalidArgument {
            message: "competitorIds must contain at least one location id".to_string(),
        });
    }

    let target = queries::get_location(db, target_id)
        .await?
        .ok_or_else(|| AnalyticsError::NotFound {
            location_id: target_id.to_string(),
        })?;

    let fetched = queries::get_locations_by_ids(db, competitor_ids).await?;
    let by_id: BTreeMap<&str, &LocationRow> =
        fetched.iter().map(|l| (l.id.as_str(), l)).collect();

    // Preserve caller order and surface the first unresolvable id.
    let mut competitors = Vec::with_capacity(competitor_ids.len());
    for id in competitor_ids {
        let location = by_id.get(id.as_str()).ok_or_else(|| AnalyticsError::NotFound {
            location_id: id.clone(),
        })?;
        competitors.push((*location).clone());
    }

    Ok((target, competitors))
}

/// Aligns the category distribution of a target location against one or
/// more competitors on a unioned category axis.
///
/// Every side's breakdown covers the full axis, defaulting to a zero
/// share where a location has no tenants in a category present elsewhere
/// in the comparison set. Also classifies missing / over- / under-
/// represented categories against the combined competitor pool.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidArgument`] if `competitor_ids` is empty.
/// * [`AnalyticsError::NotFound`] if the target or any competitor id does
///   not resolve (fail-fast, no partial comparison).
/// * [`AnalyticsError::Database`] if a store query fails.
pub async fn compare_tenant_categories(
    db: &dyn Database,
    target_id: &str,
    competitor_ids: &[String],
) -> Result<ComparisonResult, AnalyticsError> {
    let (target, competitors) = resolve_participants(db, target_id, competitor_ids).await?;

    let target_tenants = queries::get_tenants_for_location(db, &target.id).await?;

    let competitor_location_ids: Vec<String> =
        competitors.iter().map(|c| c.id.clone()).collect();
    let competitor_tenants =
        queries::get_tenants_for_locations(db, &competitor_location_ids).await?;

    let target_sparse = category_distribution(&target_tenants);
    let combined_sparse = category_distribution(&competitor_tenants);

    let per_competitor_sparse: Vec<(&LocationRow, Vec<CategoryShare>, u64)> = competitors
        .iter()
        .map(|competitor| {
            let own: Vec<TenantRow> = competitor_tenants
                .iter()
                .filter(|t| t.location_id == competitor.id)
                .cloned()
                .collect();
            let count = own.len() as u64;
            (competitor, category_distribution(&own), count)
        })
        .collect();

    // Union axis: every category appearing on any side, lexically ordered.
    let mut axis_set: BTreeSet<String> = BTreeSet::new();
    axis_set.extend(target_sparse.iter().map(|s| s.category.clone()));
    axis_set.extend(combined_sparse.iter().map(|s| s.category.clone()));
    for (_, sparse, _) in &per_competitor_sparse {
        axis_set.extend(sparse.iter().map(|s| s.category.clone()));
    }
    let categories: Vec<String> = axis_set.into_iter().collect();

    let gaps = classify_gaps(&target_sparse, &combined_sparse, competitors.len() as u64);

    let competitor_sides: Vec<ComparisonSide> = per_competitor_sparse
        .into_iter()
        .map(|(competitor, sparse, tenant_count)| ComparisonSide {
            location_id: competitor.id.clone(),
            location_name: competitor.name.clone(),
            total_tenants: tenant_count,
            shares: expand_to_axis(&categories, &sparse),
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let average_tenants_per_location = if competitors.is_empty() {
        0.0
    } else {
        round1(competitor_tenants.len() as f64 / competitors.len() as f64)
    };

    Ok(ComparisonResult {
        target: ComparisonSide {
            location_id: target.id.clone(),
            location_name: target.name.clone(),
            total_tenants: target_tenants.len() as u64,
            shares: expand_to_axis(&categories, &target_sparse),
        },
        competitors: competitor_sides,
        competitor_aggregate: CompetitorAggregate {
            total_locations: competitors.len() as u64,
            total_tenants: competitor_tenants.len() as u64,
            average_tenants_per_location,
            shares: expand_to_axis(&categories, &combined_sparse),
        },
        gaps,
        categories,
    })
}

/// Finds competitor tenant brands absent from the target's roster.
///
/// Names match case-insensitively after trimming; anchor tenants are
/// skipped (they are location-specific). Ordered by how many competitors
/// carry the brand, descending, then by name.
///
/// # Errors
///
/// Same contract as [`compare_tenant_categories`].
pub async fn find_missing_brands(
    db: &dyn Database,
    target_id: &str,
    competitor_ids: &[String],
) -> Result<Vec<MissingBrand>, AnalyticsError> {
    let (target, competitors) = resolve_participants(db, target_id, competitor_ids).await?;

    let target_tenants = queries::get_tenants_for_location(db, &target.id).await?;
    let target_names: BTreeSet<String> = target_tenants
        .iter()
        .map(|t| t.name.trim().to_lowercase())
        .collect();

    let competitor_location_ids: Vec<String> =
        competitors.iter().map(|c| c.id.clone()).collect();
    let competitor_tenants =
        queries::get_tenants_for_locations(db, &competitor_location_ids).await?;

    let names_by_id: BTreeMap<&str, &str> = competitors
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut brands: BTreeMap<(String, String), MissingBrand> = BTreeMap::new();
    for tenant in &competitor_tenants {
        if tenant.is_anchor_tenant {
            continue;
        }
        let name_key = tenant.name.trim().to_lowercase();
        if target_names.contains(&name_key) {
            continue;
        }

        let category = canonicalize_category(tenant.category.as_deref());
        let brand = brands
            .entry((name_key, category.clone()))
            .or_insert_with(|| MissingBrand {
                name: tenant.name.trim().to_string(),
                category,
                present_in: Vec::new(),
            });
        brand.present_in.push(BrandPresence {
            location_id: tenant.location_id.clone(),
            location_name: names_by_id
                .get(tenant.location_id.as_str())
                .copied()
                .unwrap_or_default()
                .to_string(),
        });
    }

    let mut result: Vec<MissingBrand> = brands.into_values().collect();
    result.sort_by(|a, b| {
        b.present_in
            .len()
            .cmp(&a.present_in.len())
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(result)
}
