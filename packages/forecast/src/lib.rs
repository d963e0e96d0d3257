#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-bin forecast aggregation.
//!
//! For a requested year the aggregator combines each bin's historical
//! statistics with the output of an optional external forecasting model and
//! emits one risk-classified record per bin. The model is an opaque
//! collaborator: when it is absent, fails, or returns unusable numbers, the
//! bin degrades to historical-only output. A model failure is logged and
//! absorbed here; it never aborts the batch and never surfaces to callers.
//!
//! Bins with no recorded events still produce a record: maximum magnitude
//! 0.0, zero count, low risk.

use std::sync::Arc;

use quake_forecast_forecast_models::{
    BinFailure, ForecastBatch, ForecastDetail, ForecastRecord, ModelPrediction,
};
use quake_forecast_geography::BinRegistry;
use quake_forecast_geography_models::Bin;
use quake_forecast_quake_models::RiskLevel;
use quake_forecast_store::HistoricalStore;
use thiserror::Error;

/// Failure reported by an external forecasting model. Always recovered
/// from locally by degrading to historical statistics.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model could not produce a prediction.
    #[error("forecast model unavailable: {message}")]
    Unavailable {
        /// Model-provided failure description.
        message: String,
    },

    /// The model did not answer within its caller-supplied deadline.
    #[error("forecast model timed out")]
    TimedOut,
}

/// External forecasting model collaborator.
///
/// Implementations wrapping a network call are responsible for bounding it
/// with their own timeout and reporting [`ModelError::TimedOut`] instead of
/// hanging.
pub trait ForecastModel: Send + Sync {
    /// Predicts the maximum magnitude and event count for one (bin, year)
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when no prediction can be produced; the
    /// aggregator then falls back to historical statistics.
    fn predict(&self, bin_id: u32, year: i32) -> Result<ModelPrediction, ModelError>;
}

/// Computes per-bin, per-year forecast records from historical data and an
/// optional predictive model.
pub struct ForecastAggregator {
    registry: Arc<BinRegistry>,
    store: Arc<HistoricalStore>,
    model: Option<Arc<dyn ForecastModel>>,
}

impl ForecastAggregator {
    /// Creates an aggregator producing historical-only forecasts.
    #[must_use]
    pub fn new(registry: Arc<BinRegistry>, store: Arc<HistoricalStore>) -> Self {
        Self {
            registry,
            store,
            model: None,
        }
    }

    /// Attaches an external forecasting model whose predictions replace
    /// historical statistics when available.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn ForecastModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Forecasts every bin in the partition for one year.
    ///
    /// Emits exactly one record per bin in ascending bin-id order. A bin
    /// whose aggregation fails is reported in `failures` without affecting
    /// the other bins.
    #[must_use]
    pub fn forecast(&self, year: i32) -> ForecastBatch {
        let mut records = Vec::with_capacity(self.registry.len());
        let mut failures = Vec::new();

        for bin in self.registry.all_bins() {
            match self.try_forecast_bin(bin, year) {
                Ok(record) => records.push(record),
                Err(failure) => {
                    log::error!(
                        "Failed to aggregate bin {} for {year}: {}",
                        failure.bin_id,
                        failure.message
                    );
                    failures.push(failure);
                }
            }
        }

        ForecastBatch {
            year,
            records,
            failures,
        }
    }

    /// Forecasts a single bin and enriches the record with location text,
    /// an activity-trend summary, and tier-appropriate recommendations.
    ///
    /// Returns `None` when `bin_id` is not in the registry.
    #[must_use]
    pub fn forecast_detail(&self, bin_id: u32, year: i32) -> Option<ForecastDetail> {
        let bin = self.registry.get_bin(bin_id)?;

        let forecast = self.try_forecast_bin(bin, year).unwrap_or_else(|failure| {
            log::warn!(
                "Detail aggregation for bin {bin_id} fell back to the zero-data record: {}",
                failure.message
            );
            zero_data_record(bin_id, year)
        });

        let recommendations = recommendations(forecast.risk_level);
        Some(ForecastDetail {
            location: location_text(bin),
            historical_pattern: self.historical_pattern(bin_id, year),
            recommendations,
            forecast,
        })
    }

    /// Aggregates one bin: historical statistics, overridden by the model's
    /// prediction when one is available and usable.
    fn try_forecast_bin(&self, bin: &Bin, year: i32) -> Result<ForecastRecord, BinFailure> {
        let stats = self.store.stats(bin.id, year);
        let historical_max = match stats.max_magnitude {
            Some(m) if !m.is_finite() => {
                return Err(BinFailure {
                    bin_id: bin.id,
                    message: format!("historical maximum magnitude for {year} is not finite"),
                });
            }
            Some(m) => m,
            None => 0.0,
        };

        let (max_magnitude, num_earthquakes, confidence_level) = match self.predict(bin.id, year) {
            Some(prediction) => (
                prediction.max_magnitude,
                prediction.num_earthquakes,
                prediction.confidence_level,
            ),
            None => (historical_max, stats.count, None),
        };

        Ok(ForecastRecord {
            bin_id: bin.id,
            year,
            max_magnitude,
            num_earthquakes,
            risk_level: RiskLevel::from_magnitude(max_magnitude),
            confidence_level,
        })
    }

    /// Asks the configured model for a prediction, absorbing any failure
    /// or unusable output into the degrade path.
    fn predict(&self, bin_id: u32, year: i32) -> Option<ModelPrediction> {
        let model = self.model.as_ref()?;
        match model.predict(bin_id, year) {
            Ok(prediction) if prediction.max_magnitude.is_finite() => Some(prediction),
            Ok(prediction) => {
                log::warn!(
                    "Forecast model returned non-finite magnitude {} for bin {bin_id} year \
                     {year}, using historical statistics",
                    prediction.max_magnitude
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "Forecast model failed for bin {bin_id} year {year}: {e}, using historical \
                     statistics"
                );
                None
            }
        }
    }

    /// Compares the queried year's event count against the mean of the
    /// preceding five calendar years in the same bin.
    fn historical_pattern(&self, bin_id: u32, year: i32) -> String {
        let current = self.store.stats(bin_id, year).count;
        let prior_total: u64 = (1..=5)
            .map(|offset| self.store.stats(bin_id, year - offset).count)
            .sum();

        if current == 0 && prior_total == 0 {
            return "No recorded seismicity in recent years".to_string();
        }

        #[allow(clippy::cast_precision_loss)]
        let prior_avg = prior_total as f64 / 5.0;
        #[allow(clippy::cast_precision_loss)]
        let current = current as f64;

        if current > prior_avg * 1.25 {
            "Increasing seismic activity".to_string()
        } else if current < prior_avg * 0.75 {
            "Decreasing seismic activity".to_string()
        } else {
            "Stable seismic activity".to_string()
        }
    }
}

/// The record emitted for a bin with no usable data.
fn zero_data_record(bin_id: u32, year: i32) -> ForecastRecord {
    ForecastRecord {
        bin_id,
        year,
        max_magnitude: 0.0,
        num_earthquakes: 0,
        risk_level: RiskLevel::Low,
        confidence_level: None,
    }
}

/// Human-readable location text for a bin: its place names when present,
/// otherwise its name.
fn location_text(bin: &Bin) -> String {
    if bin.locations.is_empty() {
        bin.name.clone()
    } else {
        bin.locations.join(", ")
    }
}

/// Tier-appropriate guidance strings. Never empty.
fn recommendations(risk_level: RiskLevel) -> Vec<String> {
    let texts: &[&str] = if risk_level.is_elevated() {
        &[
            "Monitor seismic activity closely",
            "Review emergency preparedness plans",
            "Conduct safety inspections",
        ]
    } else {
        &[
            "Continue routine monitoring",
            "Maintain standard safety protocols",
        ]
    };
    texts.iter().map(ToString::to_string).collect()
}
