#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the quake forecast server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the core data-layer types to allow independent evolution of the
//! API contract.

use chrono::{DateTime, Utc};
use quake_forecast_forecast_models::{BinFailure, ForecastDetail, ForecastRecord};
use quake_forecast_geography_models::Bin;
use quake_forecast_quake_models::RiskLevel;
use quake_forecast_store_models::EarthquakeEvent;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A catalog entry for one spatial bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBin {
    /// Stable bin identifier.
    pub id: u32,
    /// Human-readable bin name.
    pub name: String,
    /// Western longitude boundary.
    pub lon_min: f64,
    /// Eastern longitude boundary.
    pub lon_max: f64,
    /// Southern latitude boundary.
    pub lat_min: f64,
    /// Northern latitude boundary.
    pub lat_max: f64,
    /// Center latitude (midpoint of bounds).
    pub center_lat: f64,
    /// Center longitude (midpoint of bounds).
    pub center_lon: f64,
    /// Area in square degrees.
    pub area: f64,
    /// Longitudinal span in degrees.
    pub width: f64,
    /// Latitudinal span in degrees.
    pub height: f64,
    /// Place names covered by this bin.
    pub locations: Vec<String>,
}

impl From<&Bin> for ApiBin {
    fn from(bin: &Bin) -> Self {
        let (center_lat, center_lon) = bin.center();
        Self {
            id: bin.id,
            name: bin.name.clone(),
            lon_min: bin.bounds.lon_min,
            lon_max: bin.bounds.lon_max,
            lat_min: bin.bounds.lat_min,
            lat_max: bin.bounds.lat_max,
            center_lat,
            center_lon,
            area: bin.area(),
            width: bin.bounds.width(),
            height: bin.bounds.height(),
            locations: bin.locations.clone(),
        }
    }
}

/// One bin's forecast in the yearly listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBinForecast {
    /// Bin the forecast applies to.
    pub bin_id: u32,
    /// Maximum expected magnitude.
    pub max_magnitude: f64,
    /// Expected number of earthquakes.
    pub num_earthquakes: u64,
    /// Risk tier derived from the magnitude.
    pub risk_level: RiskLevel,
    /// Model confidence, absent for historical-only output.
    pub confidence_level: Option<f64>,
}

impl From<ForecastRecord> for ApiBinForecast {
    fn from(record: ForecastRecord) -> Self {
        Self {
            bin_id: record.bin_id,
            max_magnitude: record.max_magnitude,
            num_earthquakes: record.num_earthquakes,
            risk_level: record.risk_level,
            confidence_level: record.confidence_level,
        }
    }
}

/// A bin whose aggregation failed, reported alongside the records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBinFailure {
    /// The bin that failed to aggregate.
    pub bin_id: u32,
    /// Failure description.
    pub message: String,
}

impl From<BinFailure> for ApiBinFailure {
    fn from(failure: BinFailure) -> Self {
        Self {
            bin_id: failure.bin_id,
            message: failure.message,
        }
    }
}

/// Response for the yearly forecast listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForecastResponse {
    /// Forecast year.
    pub year: i32,
    /// When this response was generated.
    pub generated_at: DateTime<Utc>,
    /// Per-bin forecasts, bin id ascending.
    pub forecast_data: Vec<ApiBinForecast>,
    /// Sum of expected earthquakes across all bins.
    pub total_earthquakes: u64,
    /// Largest expected magnitude across all bins.
    pub max_expected_magnitude: f64,
    /// Bins whose aggregation failed.
    pub failures: Vec<ApiBinFailure>,
}

/// Response for the single-bin forecast detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForecastDetail {
    /// Bin the forecast applies to.
    pub bin_id: u32,
    /// Forecast year.
    pub year: i32,
    /// Maximum expected magnitude.
    pub max_magnitude: f64,
    /// Expected number of earthquakes.
    pub num_earthquakes: u64,
    /// Risk tier derived from the magnitude.
    pub risk_level: RiskLevel,
    /// Model confidence, absent for historical-only output.
    pub confidence_level: Option<f64>,
    /// Human-readable location text for the bin.
    pub location: String,
    /// Summary of the bin's recent activity trend.
    pub historical_pattern: String,
    /// Tier-appropriate guidance.
    pub recommendations: Vec<String>,
}

impl From<ForecastDetail> for ApiForecastDetail {
    fn from(detail: ForecastDetail) -> Self {
        Self {
            bin_id: detail.forecast.bin_id,
            year: detail.forecast.year,
            max_magnitude: detail.forecast.max_magnitude,
            num_earthquakes: detail.forecast.num_earthquakes,
            risk_level: detail.forecast.risk_level,
            confidence_level: detail.forecast.confidence_level,
            location: detail.location,
            historical_pattern: detail.historical_pattern,
            recommendations: detail.recommendations,
        }
    }
}

/// A historical event as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEarthquake {
    /// Store-assigned event id.
    pub id: u64,
    /// When the earthquake occurred (ISO 8601).
    pub timestamp: DateTime<Utc>,
    /// Epicenter latitude.
    pub latitude: f64,
    /// Epicenter longitude.
    pub longitude: f64,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
    /// Reported magnitude.
    pub magnitude: f64,
    /// Free-text place description.
    pub place_name: String,
    /// Owning bin, absent when the epicenter matched no bin.
    pub bin_id: Option<u32>,
}

impl From<EarthquakeEvent> for ApiEarthquake {
    fn from(event: EarthquakeEvent) -> Self {
        Self {
            id: event.id,
            timestamp: event.timestamp,
            latitude: event.latitude,
            longitude: event.longitude,
            depth_km: event.depth_km,
            magnitude: event.magnitude,
            place_name: event.place_name,
            bin_id: event.bin_id,
        }
    }
}

/// Query parameters for the forecast endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQueryParams {
    /// Forecast year; defaults to the current UTC year when absent.
    pub year: Option<i32>,
}

/// Query parameters for the historical data endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalQueryParams {
    /// Minimum magnitude (inclusive).
    pub min_magnitude: Option<f64>,
    /// Maximum magnitude (inclusive).
    pub max_magnitude: Option<f64>,
    /// Restrict to one bin.
    pub bin_id: Option<u32>,
    /// Earliest timestamp (ISO 8601, inclusive).
    pub start_date: Option<DateTime<Utc>>,
    /// Latest timestamp (ISO 8601, inclusive).
    pub end_date: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Echo of the filters applied to a historical query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHistoricalFilters {
    /// Minimum magnitude filter, if given.
    pub min_magnitude: Option<f64>,
    /// Maximum magnitude filter, if given.
    pub max_magnitude: Option<f64>,
    /// Bin filter, if given.
    pub bin_id: Option<u32>,
    /// Start of the date range, if given.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the date range, if given.
    pub end_date: Option<DateTime<Utc>>,
    /// Result limit, if given.
    pub limit: Option<u32>,
    /// Pagination offset, if given.
    pub offset: Option<u32>,
}

/// Response for the historical data endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHistoricalResponse {
    /// Matching events.
    pub data: Vec<ApiEarthquake>,
    /// Number of events in `data`.
    pub total_count: usize,
    /// The filters this response was computed under.
    pub filters_applied: ApiHistoricalFilters,
}

/// Combined partition and data statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Name of the loaded partition dataset.
    pub dataset: String,
    /// Number of bins in the partition.
    pub bin_count: usize,
    /// Sum of bin areas in square degrees.
    pub total_area: f64,
    /// Total number of stored events.
    pub total_events: u64,
    /// Largest stored magnitude.
    pub max_magnitude: Option<f64>,
    /// Mean stored magnitude.
    pub avg_magnitude: Option<f64>,
    /// Timestamp of the oldest stored event.
    pub earliest_event: Option<DateTime<Utc>>,
    /// Timestamp of the newest stored event.
    pub latest_event: Option<DateTime<Utc>>,
    /// Events whose epicenter matched no bin.
    pub unassigned_events: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error description.
    pub error: String,
    /// HTTP status code mirrored into the body.
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_forecast_geography_models::BinBounds;

    #[test]
    fn api_bin_derives_center_area_and_dimensions() {
        let bin = Bin {
            id: 3,
            name: "Metro Manila".to_string(),
            bounds: BinBounds::new(120.5, 121.5, 14.0, 15.0),
            locations: vec!["Manila".to_string()],
        };
        let api: ApiBin = (&bin).into();
        assert_eq!(api.id, 3);
        assert!((api.center_lat - 14.5).abs() < f64::EPSILON);
        assert!((api.center_lon - 121.0).abs() < f64::EPSILON);
        assert!((api.area - 1.0).abs() < 1e-12);
        assert!((api.width - 1.0).abs() < 1e-12);
        assert!((api.height - 1.0).abs() < 1e-12);
    }

    #[test]
    fn forecast_record_maps_onto_api_shape() {
        let record = ForecastRecord {
            bin_id: 2,
            year: 2024,
            max_magnitude: 5.8,
            num_earthquakes: 8,
            risk_level: RiskLevel::Medium,
            confidence_level: Some(0.85),
        };
        let api: ApiBinForecast = record.into();
        assert_eq!(api.bin_id, 2);
        assert_eq!(api.risk_level, RiskLevel::Medium);
        assert_eq!(api.confidence_level, Some(0.85));
    }

    #[test]
    fn api_types_serialize_camel_case_with_lowercase_risk() {
        let record = ForecastRecord {
            bin_id: 2,
            year: 2024,
            max_magnitude: 5.8,
            num_earthquakes: 8,
            risk_level: RiskLevel::Medium,
            confidence_level: None,
        };
        let json = serde_json::to_value(ApiBinForecast::from(record)).unwrap();
        assert_eq!(json["binId"], 2);
        assert_eq!(json["maxMagnitude"], 5.8);
        assert_eq!(json["numEarthquakes"], 8);
        assert_eq!(json["riskLevel"], "medium");
        assert!(json["confidenceLevel"].is_null());
    }
}
