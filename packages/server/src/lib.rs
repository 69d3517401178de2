#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the retail analytics engine.
//!
//! Serves the radius analytics, tenant comparison, and gap analysis
//! queries as a JSON REST API. The server holds no state beyond the
//! database handle — every request is an independent read (plus the
//! dominant-category cache write, which reconciliation jobs drive
//! separately).

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use flourish_database::{db, run_migrations};
use std::sync::Arc;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
}

/// Starts the retail analytics API server.
///
/// Connects to the database, runs migrations, and starts the Actix-Web
/// HTTP server. This is a regular async function — the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection fails or migrations fail.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref())
        .await
        .expect("Failed to run migrations");

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route(
                        "/analytics/category-distribution",
                        web::get().to(handlers::category_distribution),
                    )
                    .route(
                        "/analytics/largest-category",
                        web::get().to(handlers::largest_category),
                    )
                    .route(
                        "/analytics/tenant-comparison",
                        web::get().to(handlers::tenant_comparison),
                    )
                    .route("/gaps", web::get().to(handlers::gap_summary))
                    .route("/gaps/{field}", web::get().to(handlers::gap_field)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
