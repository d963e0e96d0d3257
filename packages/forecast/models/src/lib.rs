#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forecast record and prediction result types.
//!
//! A forecast record is the aggregated output for one (bin, year) pair:
//! maximum expected magnitude, event count, and the risk tier derived from
//! the magnitude. Records are computed on demand per query and never
//! persisted or mutated after construction.

use quake_forecast_quake_models::RiskLevel;
use serde::{Deserialize, Serialize};

/// Output of an external forecasting model for one (bin, year) pair.
/// Opaque to this system beyond its field values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Predicted maximum magnitude.
    pub max_magnitude: f64,
    /// Predicted number of earthquakes.
    pub num_earthquakes: u64,
    /// Model confidence in \[0, 1\], when the model reports one.
    pub confidence_level: Option<f64>,
}

/// The aggregated forecast for one (bin, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Bin the forecast applies to.
    pub bin_id: u32,
    /// Calendar year the forecast applies to.
    pub year: i32,
    /// Maximum expected magnitude. A bin with no data reports 0.0.
    pub max_magnitude: f64,
    /// Expected number of earthquakes.
    pub num_earthquakes: u64,
    /// Risk tier, always derived from `max_magnitude`.
    pub risk_level: RiskLevel,
    /// Model confidence, absent for historical-only output.
    pub confidence_level: Option<f64>,
}

/// A bin whose aggregation failed. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinFailure {
    /// The bin that failed to aggregate.
    pub bin_id: u32,
    /// Human-readable failure description.
    pub message: String,
}

/// One year's forecast across the whole partition: a record per bin in
/// ascending bin-id order, plus any per-bin failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBatch {
    /// Forecast year.
    pub year: i32,
    /// One record per successfully aggregated bin, bin id ascending.
    pub records: Vec<ForecastRecord>,
    /// Bins whose aggregation failed.
    pub failures: Vec<BinFailure>,
}

/// A forecast record enriched with descriptive context for one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDetail {
    /// The underlying forecast record.
    pub forecast: ForecastRecord,
    /// Human-readable location text for the bin.
    pub location: String,
    /// Deterministic summary of the bin's recent activity trend.
    pub historical_pattern: String,
    /// Tier-appropriate guidance. Never empty.
    pub recommendations: Vec<String>,
}
