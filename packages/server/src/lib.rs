#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the quake forecast application.
//!
//! Builds the core at startup — partition registry, spatial index,
//! historical store seeded with the embedded catalog, forecast aggregator —
//! and serves the REST API over it: bin catalog, yearly forecasts, per-bin
//! forecast detail, and filtered historical data. A malformed partition
//! table aborts startup; queries never mutate shared state.

mod handlers;
pub mod seed;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use quake_forecast_forecast::ForecastAggregator;
use quake_forecast_geography::{BinRegistry, datasets};
use quake_forecast_service::{QueryService, ServiceConfig};
use quake_forecast_spatial::SpatialIndex;
use quake_forecast_store::{HistoricalStore, StoreConfig};

/// Shared application state.
pub struct AppState {
    /// The query facade all handlers delegate to.
    pub service: Arc<QueryService>,
}

/// Starts the quake forecast API server.
///
/// Loads the partition dataset named by `QUAKE_DATASET` (default
/// `regions`), builds the spatial index and store, seeds the embedded
/// catalog, and starts the Actix-Web HTTP server. This is a regular async
/// function — the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the partition dataset is unknown or malformed, or if the
/// embedded seed catalog fails validation.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let dataset =
        std::env::var("QUAKE_DATASET").unwrap_or_else(|_| datasets::DEFAULT_DATASET.to_string());
    log::info!("Loading partition dataset '{dataset}'...");
    let registry =
        Arc::new(BinRegistry::load(&dataset).expect("Failed to load partition dataset"));

    let spatial = Arc::new(SpatialIndex::from_bins(registry.all_bins()));
    let store = Arc::new(HistoricalStore::new(spatial, StoreConfig::default()));

    let seeded = seed::seed_store(&store);
    log::info!("Seeded {seeded} historical events");

    let aggregator = ForecastAggregator::new(Arc::clone(&registry), Arc::clone(&store));
    let service = Arc::new(QueryService::new(
        registry,
        store,
        aggregator,
        ServiceConfig::default(),
    ));

    let state = web::Data::new(AppState { service });

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
                    .route("/bins", web::get().to(handlers::bins))
                    .route("/forecast", web::get().to(handlers::forecast))
                    .route("/forecast/{bin_id}", web::get().to(handlers::forecast_detail))
                    .route("/historical-data", web::get().to(handlers::historical_data))
                    .route("/stats", web::get().to(handlers::stats)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
