//! Typed query functions for the retail location store.
//!
//! All functions operate on a `&dyn Database` so callers can run against
//! `PostgreSQL` in production and in-memory `SQLite` in tests. Raw SQL with
//! `$N` placeholders is used throughout; `switchy_database` adapts the
//! placeholder style per backend.

use std::fmt::Write as _;

use flourish_database_models::{LocationRow, TenantRow};
use flourish_retail_models::LocationType;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Column list shared by every `locations` SELECT.
const LOCATION_COLUMNS: &str = "id, name, location_type, address, city, county, postcode,
     latitude, longitude, website, phone, opening_hours, parking_spaces,
     owner, management, instagram, facebook, number_of_stores,
     total_floor_area, largest_category, largest_category_percent, is_managed";

fn parse_location(row: &switchy_database::Row) -> LocationRow {
    let type_name: String = row.to_value("location_type").unwrap_or_default();
    // Bulk imports occasionally carry unmapped type strings; default them
    // the same way the ingest pipeline does.
    let location_type = type_name
        .parse::<LocationType>()
        .unwrap_or(LocationType::ShoppingCentre);

    LocationRow {
        id: row.to_value("id").unwrap_or_default(),
        name: row.to_value("name").unwrap_or_default(),
        location_type,
        address: row.to_value("address").unwrap_or(None),
        city: row.to_value("city").unwrap_or(None),
        county: row.to_value("county").unwrap_or(None),
        postcode: row.to_value("postcode").unwrap_or(None),
        latitude: row.to_value("latitude").unwrap_or(None),
        longitude: row.to_value("longitude").unwrap_or(None),
        website: row.to_value("website").unwrap_or(None),
        phone: row.to_value("phone").unwrap_or(None),
        opening_hours: row.to_value("opening_hours").unwrap_or(None),
        parking_spaces: row.to_value("parking_spaces").unwrap_or(None),
        owner: row.to_value("owner").unwrap_or(None),
        management: row.to_value("management").unwrap_or(None),
        instagram: row.to_value("instagram").unwrap_or(None),
        facebook: row.to_value("facebook").unwrap_or(None),
        number_of_stores: row.to_value("number_of_stores").unwrap_or(None),
        total_floor_area: row.to_value("total_floor_area").unwrap_or(None),
        largest_category: row.to_value("largest_category").unwrap_or(None),
        largest_category_percent: row.to_value("largest_category_percent").unwrap_or(None),
        is_managed: row.to_value("is_managed").unwrap_or(false),
    }
}

fn parse_tenant(row: &switchy_database::Row) -> TenantRow {
    TenantRow {
        id: row.to_value("id").unwrap_or_default(),
        location_id: row.to_value("location_id").unwrap_or_default(),
        name: row.to_value("name").unwrap_or_default(),
        category: row.to_value("category").unwrap_or(None),
        subcategory: row.to_value("subcategory").unwrap_or(None),
        is_anchor_tenant: row.to_value("is_anchor_tenant").unwrap_or(false),
    }
}

/// Fetches a single location by id.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_location(db: &dyn Database, id: &str) -> Result<Option<LocationRow>, DbError> {
    let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1");
    let rows = db
        .query_raw_params(&sql, &[DatabaseValue::String(id.to_string())])
        .await?;

    Ok(rows.first().map(parse_location))
}

/// Fetches every location in the dataset.
///
/// The dataset is a few thousand rows; a full fetch is how both the naive
/// radius scan and the gap analyzer consume it.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_all_locations(db: &dyn Database) -> Result<Vec<LocationRow>, DbError> {
    let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations");
    let rows = db.query_raw_params(&sql, &[]).await?;

    Ok(rows.iter().map(parse_location).collect())
}

/// Fetches the locations matching the given ids, in no particular order.
///
/// Missing ids are simply absent from the result — callers that need
/// fail-fast semantics check the returned set against the requested one.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_locations_by_ids(
    db: &dyn Database,
    ids: &[String],
) -> Result<Vec<LocationRow>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id IN (");
    let mut params: Vec<DatabaseValue> = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        write!(sql, "${}", i + 1).unwrap();
        params.push(DatabaseValue::String(id.clone()));
    }
    sql.push(')');

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows.iter().map(parse_location).collect())
}

/// Fetches all tenants belonging to a single location.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_tenants_for_location(
    db: &dyn Database,
    location_id: &str,
) -> Result<Vec<TenantRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, location_id, name, category, subcategory, is_anchor_tenant
             FROM tenants WHERE location_id = $1",
            &[DatabaseValue::String(location_id.to_string())],
        )
        .await?;

    Ok(rows.iter().map(parse_tenant).collect())
}

/// Fetches all tenants belonging to any of the given locations.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_tenants_for_locations(
    db: &dyn Database,
    location_ids: &[String],
) -> Result<Vec<TenantRow>, DbError> {
    if location_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT id, location_id, name, category, subcategory, is_anchor_tenant
         FROM tenants WHERE location_id IN (",
    );
    let mut params: Vec<DatabaseValue> = Vec::with_capacity(location_ids.len());
    for (i, id) in location_ids.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        write!(sql, "${}", i + 1).unwrap();
        params.push(DatabaseValue::String(id.clone()));
    }
    sql.push(')');

    let rows = db.query_raw_params(&sql, &params).await?;

    Ok(rows.iter().map(parse_tenant).collect())
}

/// Writes the denormalized dominant-category cache for one location.
///
/// Single-statement UPDATE, so concurrent recomputations of the same
/// location serialize at the store and last-write-wins — acceptable because
/// the computation is deterministic for a stable tenant roster.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn update_largest_category(
    db: &dyn Database,
    id: &str,
    category: Option<&str>,
    percent: Option<f64>,
) -> Result<u64, DbError> {
    let updated = db
        .exec_raw_params(
            "UPDATE locations SET largest_category = $1, largest_category_percent = $2
             WHERE id = $3",
            &[
                category.map_or(DatabaseValue::Null, |c| DatabaseValue::String(c.to_string())),
                percent.map_or(DatabaseValue::Null, DatabaseValue::Real64),
                DatabaseValue::String(id.to_string()),
            ],
        )
        .await?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchy_database_connection::init_sqlite_rusqlite;

    async fn test_db() -> Box<dyn Database> {
        let db = init_sqlite_rusqlite(None).expect("in-memory sqlite");
        crate::run_migrations(db.as_ref()).await.expect("migrations");
        db
    }

    async fn seed_location(db: &dyn Database, id: &str, name: &str, lat: f64, lon: f64) {
        db.exec_raw(&format!(
            "INSERT INTO locations (id, name, location_type, latitude, longitude, is_managed)
             VALUES ('{id}', '{name}', 'SHOPPING_CENTRE', {lat}, {lon}, FALSE)"
        ))
        .await
        .expect("insert location");
    }

    #[tokio::test]
    async fn fetches_location_by_id() {
        let db = test_db().await;
        seed_location(db.as_ref(), "loc-1", "Queensgate", 52.5736, -0.2478).await;

        let loc = get_location(db.as_ref(), "loc-1")
            .await
            .unwrap()
            .expect("location exists");
        assert_eq!(loc.name, "Queensgate");
        assert!(loc.has_coordinates());

        assert!(get_location(db.as_ref(), "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetches_tenants_for_multiple_locations() {
        let db = test_db().await;
        seed_location(db.as_ref(), "a", "A", 1.0, 1.0).await;
        seed_location(db.as_ref(), "b", "B", 2.0, 2.0).await;
        db.exec_raw(
            "INSERT INTO tenants (id, location_id, name, category, is_anchor_tenant) VALUES
             ('t1', 'a', 'Boots', 'Health & Beauty', FALSE),
             ('t2', 'b', 'Next', 'Clothing & Footwear', FALSE)",
        )
        .await
        .unwrap();

        let tenants =
            get_tenants_for_locations(db.as_ref(), &["a".to_string(), "b".to_string()])
                .await
                .unwrap();
        assert_eq!(tenants.len(), 2);
    }

    #[tokio::test]
    async fn updates_largest_category_cache() {
        let db = test_db().await;
        seed_location(db.as_ref(), "loc-1", "Queensgate", 52.5736, -0.2478).await;

        let updated =
            update_largest_category(db.as_ref(), "loc-1", Some("Clothing & Footwear"), Some(40.0))
                .await
                .unwrap();
        assert_eq!(updated, 1);

        let loc = get_location(db.as_ref(), "loc-1").await.unwrap().unwrap();
        assert_eq!(loc.largest_category.as_deref(), Some("Clothing & Footwear"));
        assert_eq!(loc.largest_category_percent, Some(40.0));
    }
}
