#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query facade over the forecasting core.
//!
//! This is the surface the HTTP layer (or any other caller) talks to. It
//! validates inputs — the supported forecast year range, satisfiable filter
//! combinations — and delegates to the registry, store, and aggregator.
//! Outcomes are typed so callers can map a rejected request and a missing
//! bin to distinct responses. No business logic lives here.

use std::sync::Arc;

use quake_forecast_forecast::ForecastAggregator;
use quake_forecast_forecast_models::{ForecastBatch, ForecastDetail};
use quake_forecast_geography::{BinRegistry, RegistrySummary};
use quake_forecast_geography_models::Bin;
use quake_forecast_store::HistoricalStore;
use quake_forecast_store_models::{EarthquakeEvent, EventQuery, StoreSummary};
use thiserror::Error;

/// Typed outcomes for rejected or unresolvable queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request is well-formed but not satisfiable as posed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// The referenced bin does not exist in the partition.
    #[error("bin {bin_id} not found")]
    BinNotFound {
        /// The unknown bin id.
        bin_id: u32,
    },
}

/// Supported forecast year range, inclusive on both ends.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Earliest year a forecast may be requested for.
    pub min_forecast_year: i32,
    /// Latest year a forecast may be requested for.
    pub max_forecast_year: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_forecast_year: 2020,
            max_forecast_year: 2030,
        }
    }
}

/// The facade exposed to external callers.
pub struct QueryService {
    registry: Arc<BinRegistry>,
    store: Arc<HistoricalStore>,
    aggregator: ForecastAggregator,
    config: ServiceConfig,
}

impl QueryService {
    /// Creates the facade over an already-constructed core.
    #[must_use]
    pub fn new(
        registry: Arc<BinRegistry>,
        store: Arc<HistoricalStore>,
        aggregator: ForecastAggregator,
        config: ServiceConfig,
    ) -> Self {
        Self {
            registry,
            store,
            aggregator,
            config,
        }
    }

    /// Full bin catalog, ordered ascending by id.
    #[must_use]
    pub fn list_bins(&self) -> &[Bin] {
        self.registry.all_bins()
    }

    /// Aggregate information about the loaded partition.
    #[must_use]
    pub fn registry_summary(&self) -> RegistrySummary {
        self.registry.summary()
    }

    /// Store-wide statistics across all ingested events.
    #[must_use]
    pub fn store_summary(&self) -> StoreSummary {
        self.store.summary()
    }

    /// Forecast for every bin in the given year.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRequest`] when `year` lies outside the
    /// configured supported range.
    pub fn forecast(&self, year: i32) -> Result<ForecastBatch, QueryError> {
        self.check_year(year)?;
        Ok(self.aggregator.forecast(year))
    }

    /// Enriched forecast for one bin in the given year.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRequest`] when `year` lies outside the
    /// configured supported range, or [`QueryError::BinNotFound`] when the
    /// bin is absent from the registry.
    pub fn forecast_detail(&self, bin_id: u32, year: i32) -> Result<ForecastDetail, QueryError> {
        self.check_year(year)?;
        self.aggregator
            .forecast_detail(bin_id, year)
            .ok_or(QueryError::BinNotFound { bin_id })
    }

    /// Historical events matching the given filters.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRequest`] when the filter combination
    /// cannot be satisfied (inverted magnitude or date range, non-finite
    /// magnitude bound).
    pub fn historical_data(&self, query: &EventQuery) -> Result<Vec<EarthquakeEvent>, QueryError> {
        if let Some(min) = query.min_magnitude {
            if !min.is_finite() {
                return Err(QueryError::InvalidRequest {
                    message: "min_magnitude is not a finite number".to_string(),
                });
            }
        }
        if let Some(max) = query.max_magnitude {
            if !max.is_finite() {
                return Err(QueryError::InvalidRequest {
                    message: "max_magnitude is not a finite number".to_string(),
                });
            }
        }
        if let (Some(min), Some(max)) = (query.min_magnitude, query.max_magnitude) {
            if min > max {
                return Err(QueryError::InvalidRequest {
                    message: format!("min_magnitude {min} exceeds max_magnitude {max}"),
                });
            }
        }
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(QueryError::InvalidRequest {
                    message: format!("date range starts at {from} but ends at {to}"),
                });
            }
        }

        Ok(self.store.query(query))
    }

    fn check_year(&self, year: i32) -> Result<(), QueryError> {
        if year < self.config.min_forecast_year || year > self.config.max_forecast_year {
            return Err(QueryError::InvalidRequest {
                message: format!(
                    "year {year} is outside the supported range {}-{}",
                    self.config.min_forecast_year, self.config.max_forecast_year
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quake_forecast_spatial::SpatialIndex;
    use quake_forecast_store::StoreConfig;
    use quake_forecast_store_models::RawEvent;

    fn service() -> QueryService {
        let registry = Arc::new(BinRegistry::load_default().unwrap());
        let spatial = Arc::new(SpatialIndex::from_bins(registry.all_bins()));
        let store = Arc::new(HistoricalStore::new(spatial, StoreConfig::default()));
        store
            .ingest(RawEvent {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
                latitude: 14.6,
                longitude: 121.0,
                depth_km: 45.2,
                magnitude: 4.5,
                place_name: "Manila Bay Area".to_string(),
            })
            .unwrap();
        let aggregator =
            ForecastAggregator::new(Arc::clone(&registry), Arc::clone(&store));
        QueryService::new(registry, store, aggregator, ServiceConfig::default())
    }

    #[test]
    fn lists_the_full_catalog() {
        let service = service();
        let bins = service.list_bins();
        assert_eq!(bins.len(), 4);
        assert_eq!(service.registry_summary().bin_count, 4);
    }

    #[test]
    fn forecast_year_bounds_are_inclusive() {
        let service = service();
        assert!(service.forecast(2020).is_ok());
        assert!(service.forecast(2030).is_ok());
        assert!(matches!(
            service.forecast(2019),
            Err(QueryError::InvalidRequest { .. })
        ));
        assert!(matches!(
            service.forecast(2031),
            Err(QueryError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn unknown_bin_detail_is_not_found() {
        let service = service();
        assert!(matches!(
            service.forecast_detail(999, 2024),
            Err(QueryError::BinNotFound { bin_id: 999 })
        ));
    }

    #[test]
    fn known_bin_detail_is_returned() {
        let service = service();
        let detail = service.forecast_detail(3, 2024).unwrap();
        assert_eq!(detail.forecast.bin_id, 3);
        assert!(!detail.recommendations.is_empty());
    }

    #[test]
    fn inverted_magnitude_range_is_rejected() {
        let service = service();
        let query = EventQuery {
            min_magnitude: Some(6.0),
            max_magnitude: Some(5.0),
            ..EventQuery::default()
        };
        assert!(matches!(
            service.historical_data(&query),
            Err(QueryError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let service = service();
        let query = EventQuery {
            from: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..EventQuery::default()
        };
        assert!(matches!(
            service.historical_data(&query),
            Err(QueryError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn satisfiable_query_delegates_to_the_store() {
        let service = service();
        let events = service.historical_data(&EventQuery::default()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].place_name, "Manila Bay Area");
    }
}
