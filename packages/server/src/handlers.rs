//! HTTP handler functions for the retail analytics API.

use actix_web::{HttpResponse, web};
use flourish_analytics::{AnalyticsError, comparison, distribution, dominant, gaps};
use flourish_analytics_models::GapField;
use flourish_server_models::{
    ApiComparison, ApiHealth, ApiLocation, ComparisonQueryParams, GapListQueryParams,
    RadiusQueryParams, RadiusResponse,
};

use crate::AppState;

/// Default search radius in kilometres.
const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Default result cap for the per-field gap listing.
const DEFAULT_GAP_LIMIT: usize = 100;

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// Maps an engine error onto the HTTP contract: `InvalidArgument` → 400,
/// `NotFound` → 404, store failures → 500 with a generic body (the detail
/// is logged, never leaked).
fn error_response(operation: &str, err: &AnalyticsError) -> HttpResponse {
    match err {
        AnalyticsError::InvalidArgument { message } => bad_request(message),
        AnalyticsError::NotFound { location_id } => HttpResponse::NotFound().json(
            serde_json::json!({ "error": format!("Location not found: {location_id}") }),
        ),
        AnalyticsError::Database(e) => {
            log::error!("{operation} failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to run {operation}")
            }))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/analytics/category-distribution`
///
/// Distribution of tenant categories across the locations within
/// `radiusKm` of `locationId`.
pub async fn category_distribution(
    state: web::Data<AppState>,
    params: web::Query<RadiusQueryParams>,
) -> HttpResponse {
    let Some(location_id) = params.location_id.as_deref() else {
        return bad_request("locationId is required");
    };
    let radius_km = params.radius_km.unwrap_or(DEFAULT_RADIUS_KM);

    match distribution::category_distribution_within_radius(
        state.db.as_ref(),
        location_id,
        radius_km,
    )
    .await
    {
        Ok(data) => HttpResponse::Ok().json(RadiusResponse {
            location_id: location_id.to_string(),
            radius_km,
            data,
        }),
        Err(e) => error_response("category distribution", &e),
    }
}

/// `GET /api/analytics/largest-category`
///
/// Aggregation of cached dominant categories across the locations within
/// `radiusKm` of `locationId`.
pub async fn largest_category(
    state: web::Data<AppState>,
    params: web::Query<RadiusQueryParams>,
) -> HttpResponse {
    let Some(location_id) = params.location_id.as_deref() else {
        return bad_request("locationId is required");
    };
    let radius_km = params.radius_km.unwrap_or(DEFAULT_RADIUS_KM);

    match dominant::largest_category_aggregation_within_radius(
        state.db.as_ref(),
        location_id,
        radius_km,
    )
    .await
    {
        Ok(data) => HttpResponse::Ok().json(RadiusResponse {
            location_id: location_id.to_string(),
            radius_km,
            data,
        }),
        Err(e) => error_response("largest-category aggregation", &e),
    }
}

/// `GET /api/analytics/tenant-comparison`
///
/// Side-by-side tenant-mix comparison of `targetId` against the
/// comma-separated `competitorIds`.
pub async fn tenant_comparison(
    state: web::Data<AppState>,
    params: web::Query<ComparisonQueryParams>,
) -> HttpResponse {
    let Some(target_id) = params.target_id.as_deref() else {
        return bad_request("targetId is required");
    };
    let competitor_ids: Vec<String> = params
        .competitor_ids
        .as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();
    if competitor_ids.is_empty() {
        return bad_request("competitorIds must contain at least one location id");
    }

    let data = match comparison::compare_tenant_categories(
        state.db.as_ref(),
        target_id,
        &competitor_ids,
    )
    .await
    {
        Ok(data) => data,
        Err(e) => return error_response("tenant comparison", &e),
    };

    let missing_brands = if params.include_brands.unwrap_or(false) {
        match comparison::find_missing_brands(state.db.as_ref(), target_id, &competitor_ids).await
        {
            Ok(brands) => Some(brands),
            Err(e) => return error_response("missing-brand analysis", &e),
        }
    } else {
        None
    };

    HttpResponse::Ok().json(ApiComparison {
        success: true,
        data,
        missing_brands,
    })
}

/// `GET /api/gaps`
///
/// Whole-dataset field completeness summary.
pub async fn gap_summary(state: web::Data<AppState>) -> HttpResponse {
    match gaps::gap_analysis(state.db.as_ref()).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response("gap analysis", &e),
    }
}

/// `GET /api/gaps/{field}`
///
/// Locations missing the given field, ranked by remediation priority.
pub async fn gap_field(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<GapListQueryParams>,
) -> HttpResponse {
    let Ok(field) = path.parse::<GapField>() else {
        return bad_request(&format!("Unknown gap field: {path}"));
    };

    let limit = match params.limit {
        None => DEFAULT_GAP_LIMIT,
        Some(l) if l > 0 => usize::try_from(l).unwrap_or(DEFAULT_GAP_LIMIT),
        Some(_) => return bad_request("limit must be a positive integer"),
    };

    match gaps::locations_missing_field(state.db.as_ref(), field, limit).await {
        Ok(rows) => {
            let locations: Vec<ApiLocation> = rows.into_iter().map(ApiLocation::from).collect();
            HttpResponse::Ok().json(locations)
        }
        Err(e) => error_response("gap field listing", &e),
    }
}
