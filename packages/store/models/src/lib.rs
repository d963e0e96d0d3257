#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake event and historical-query types.
//!
//! These are the shapes of data flowing into and out of the historical
//! store. They are distinct from the API response types in
//! `quake_forecast_server_models` to allow independent evolution of the
//! API contract.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw observation as handed over by an ingestion collaborator, before
/// validation and bin assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// When the earthquake occurred.
    pub timestamp: DateTime<Utc>,
    /// Epicenter latitude (WGS84).
    pub latitude: f64,
    /// Epicenter longitude (WGS84).
    pub longitude: f64,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
    /// Reported magnitude.
    pub magnitude: f64,
    /// Free-text place description.
    pub place_name: String,
}

/// A stored historical observation. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    /// Store-assigned identifier (insertion order).
    pub id: u64,
    /// When the earthquake occurred.
    pub timestamp: DateTime<Utc>,
    /// Epicenter latitude (WGS84).
    pub latitude: f64,
    /// Epicenter longitude (WGS84).
    pub longitude: f64,
    /// Hypocenter depth in kilometers.
    pub depth_km: f64,
    /// Reported magnitude.
    pub magnitude: f64,
    /// Free-text place description.
    pub place_name: String,
    /// Owning bin, assigned at ingestion. `None` when the epicenter lies
    /// outside every bin in the partition.
    pub bin_id: Option<u32>,
}

/// Result ordering for historical queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrdering {
    /// Most recent events first (the default).
    #[default]
    NewestFirst,
    /// Oldest events first.
    OldestFirst,
    /// Highest magnitude first.
    StrongestFirst,
}

/// Parameters for querying historical events. Every filter is
/// independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventQuery {
    /// Minimum magnitude (inclusive).
    pub min_magnitude: Option<f64>,
    /// Maximum magnitude (inclusive).
    pub max_magnitude: Option<f64>,
    /// Restrict to events assigned to this bin.
    pub bin_id: Option<u32>,
    /// Earliest timestamp (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp (inclusive).
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of results; the store applies its configured default
    /// when absent and caps at its configured maximum.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: u32,
    /// Result ordering.
    pub ordering: EventOrdering,
}

/// Per-bin aggregation of one calendar year of events.
///
/// An empty year is a valid result (`max_magnitude` absent, zero count),
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    /// Maximum magnitude among matching events, absent when none matched.
    pub max_magnitude: Option<f64>,
    /// Number of matching events.
    pub count: u64,
}

/// Store-wide statistics across all ingested events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    /// Total number of stored events.
    pub total_events: u64,
    /// Smallest stored magnitude.
    pub min_magnitude: Option<f64>,
    /// Mean stored magnitude.
    pub avg_magnitude: Option<f64>,
    /// Largest stored magnitude.
    pub max_magnitude: Option<f64>,
    /// Timestamp of the oldest stored event.
    pub earliest: Option<DateTime<Utc>>,
    /// Timestamp of the newest stored event.
    pub latest: Option<DateTime<Utc>>,
    /// Event counts keyed by assigned bin id.
    pub events_per_bin: BTreeMap<u32, u64>,
    /// Events whose epicenter matched no bin.
    pub unassigned_events: u64,
}
