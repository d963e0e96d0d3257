#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Validated append-only store for historical earthquake events.
//!
//! Events are validated and bin-assigned at ingestion, then held immutably
//! in memory. Writers serialize behind the write half of an `RwLock`;
//! queries and aggregations take the read half and run concurrently against
//! a point-in-time snapshot. A query started after an ingest completes
//! observes that event; a query racing an in-flight ingest observes either
//! the state before or after it, never a partially written event.

use std::sync::{Arc, RwLock};

use chrono::Datelike;
use quake_forecast_spatial::SpatialIndex;
use quake_forecast_store_models::{
    EarthquakeEvent, EventOrdering, EventQuery, RawEvent, StoreSummary, YearStats,
};
use thiserror::Error;

/// Upper bound of the sane magnitude range accepted at ingestion.
pub const MAX_VALID_MAGNITUDE: f64 = 10.0;

/// Errors rejecting a malformed observation at ingestion. The offending
/// event is dropped whole; nothing is partially stored.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Latitude outside the WGS84 range.
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The rejected latitude.
        value: f64,
    },

    /// Longitude outside the WGS84 range.
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The rejected longitude.
        value: f64,
    },

    /// Negative hypocenter depth.
    #[error("depth {value} km is negative")]
    NegativeDepth {
        /// The rejected depth.
        value: f64,
    },

    /// Magnitude outside the sane range.
    #[error("magnitude {value} is outside [0, {MAX_VALID_MAGNITUDE}]")]
    MagnitudeOutOfRange {
        /// The rejected magnitude.
        value: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("{field} is not a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Store tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Result count applied when a query specifies no limit.
    pub default_limit: u32,
    /// Hard cap on the result count of any single query.
    pub max_limit: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// Mutable state guarded by the store lock: the event log and the next
/// id to hand out.
struct StoreInner {
    events: Vec<EarthquakeEvent>,
    next_id: u64,
}

/// The queryable repository of past earthquake observations.
pub struct HistoricalStore {
    inner: RwLock<StoreInner>,
    spatial: Arc<SpatialIndex>,
    config: StoreConfig,
}

impl HistoricalStore {
    /// Creates an empty store that assigns bins through `spatial`.
    #[must_use]
    pub fn new(spatial: Arc<SpatialIndex>, config: StoreConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                events: Vec::new(),
                next_id: 1,
            }),
            spatial,
            config,
        }
    }

    /// Validates and stores a single observation, assigning its bin.
    ///
    /// Returns the stored event, including its assigned id and bin.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any field is non-finite or out of
    /// range; nothing is stored in that case.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn ingest(&self, raw: RawEvent) -> Result<EarthquakeEvent, ValidationError> {
        validate(&raw)?;

        let bin_id = self.spatial.assign(raw.latitude, raw.longitude);
        if bin_id.is_none() {
            log::debug!(
                "Event at ({}, {}) matches no bin, storing unassigned",
                raw.latitude,
                raw.longitude
            );
        }

        let mut inner = self.inner.write().expect("store lock poisoned");
        let event = EarthquakeEvent {
            id: inner.next_id,
            timestamp: raw.timestamp,
            latitude: raw.latitude,
            longitude: raw.longitude,
            depth_km: raw.depth_km,
            magnitude: raw.magnitude,
            place_name: raw.place_name,
            bin_id,
        };
        inner.next_id += 1;
        inner.events.push(event.clone());

        Ok(event)
    }

    /// Validates and stores a batch of observations atomically: every
    /// record is validated before any is appended, so one malformed record
    /// rejects the whole batch.
    ///
    /// Returns the number of stored events.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; nothing is stored
    /// in that case.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn ingest_batch(&self, batch: Vec<RawEvent>) -> Result<u64, ValidationError> {
        for raw in &batch {
            validate(raw)?;
        }

        let count = batch.len() as u64;
        let mut inner = self.inner.write().expect("store lock poisoned");
        for raw in batch {
            let bin_id = self.spatial.assign(raw.latitude, raw.longitude);
            let event = EarthquakeEvent {
                id: inner.next_id,
                timestamp: raw.timestamp,
                latitude: raw.latitude,
                longitude: raw.longitude,
                depth_km: raw.depth_km,
                magnitude: raw.magnitude,
                place_name: raw.place_name,
                bin_id,
            };
            inner.next_id += 1;
            inner.events.push(event);
        }

        Ok(count)
    }

    /// Queries events with the given filters, ordering, and pagination.
    ///
    /// Ordering is deterministic (event id breaks ties), so `limit` and
    /// `offset` paginate an unchanged store without duplicating or skipping
    /// rows. An absent `limit` falls back to the configured default; any
    /// requested limit is capped at the configured maximum.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn query(&self, query: &EventQuery) -> Vec<EarthquakeEvent> {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut matches: Vec<&EarthquakeEvent> = inner
            .events
            .iter()
            .filter(|event| {
                query
                    .min_magnitude
                    .is_none_or(|min| event.magnitude >= min)
                    && query
                        .max_magnitude
                        .is_none_or(|max| event.magnitude <= max)
                    && query.bin_id.is_none_or(|bin| event.bin_id == Some(bin))
                    && query.from.is_none_or(|from| event.timestamp >= from)
                    && query.to.is_none_or(|to| event.timestamp <= to)
            })
            .collect();

        match query.ordering {
            EventOrdering::NewestFirst => {
                matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            }
            EventOrdering::OldestFirst => {
                matches.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
            }
            EventOrdering::StrongestFirst => {
                matches.sort_by(|a, b| {
                    b.magnitude
                        .total_cmp(&a.magnitude)
                        .then(b.timestamp.cmp(&a.timestamp))
                        .then(b.id.cmp(&a.id))
                });
            }
        }

        let limit = query
            .limit
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit) as usize;

        matches
            .into_iter()
            .skip(query.offset as usize)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Aggregates events assigned to `bin_id` whose timestamp falls in the
    /// given calendar year (UTC).
    ///
    /// A bin/year with no matching events yields an absent maximum and a
    /// zero count; that is a valid result, not an error.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn stats(&self, bin_id: u32, year: i32) -> YearStats {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut max_magnitude: Option<f64> = None;
        let mut count = 0u64;

        for event in inner
            .events
            .iter()
            .filter(|event| event.bin_id == Some(bin_id) && event.timestamp.year() == year)
        {
            count += 1;
            max_magnitude = Some(max_magnitude.map_or(event.magnitude, |current| {
                current.max(event.magnitude)
            }));
        }

        YearStats {
            max_magnitude,
            count,
        }
    }

    /// Store-wide statistics: totals, magnitude spread, per-bin
    /// distribution, and covered date range.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn summary(&self) -> StoreSummary {
        let inner = self.inner.read().expect("store lock poisoned");

        let mut summary = StoreSummary {
            total_events: inner.events.len() as u64,
            min_magnitude: None,
            avg_magnitude: None,
            max_magnitude: None,
            earliest: None,
            latest: None,
            events_per_bin: std::collections::BTreeMap::new(),
            unassigned_events: 0,
        };

        let mut magnitude_sum = 0.0;
        for event in &inner.events {
            magnitude_sum += event.magnitude;
            summary.min_magnitude = Some(
                summary
                    .min_magnitude
                    .map_or(event.magnitude, |m| m.min(event.magnitude)),
            );
            summary.max_magnitude = Some(
                summary
                    .max_magnitude
                    .map_or(event.magnitude, |m| m.max(event.magnitude)),
            );
            summary.earliest = Some(
                summary
                    .earliest
                    .map_or(event.timestamp, |t| t.min(event.timestamp)),
            );
            summary.latest = Some(
                summary
                    .latest
                    .map_or(event.timestamp, |t| t.max(event.timestamp)),
            );
            match event.bin_id {
                Some(bin_id) => *summary.events_per_bin.entry(bin_id).or_insert(0) += 1,
                None => summary.unassigned_events += 1,
            }
        }

        if !inner.events.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let avg = magnitude_sum / inner.events.len() as f64;
            summary.avg_magnitude = Some(avg);
        }

        summary
    }

    /// Number of stored events.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("store lock poisoned").events.len()
    }

    /// Whether the store holds no events.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks every numeric field of a raw observation for finiteness and
/// range before it touches the store.
fn validate(raw: &RawEvent) -> Result<(), ValidationError> {
    if !raw.latitude.is_finite() {
        return Err(ValidationError::NonFinite { field: "latitude" });
    }
    if !raw.longitude.is_finite() {
        return Err(ValidationError::NonFinite { field: "longitude" });
    }
    if !raw.depth_km.is_finite() {
        return Err(ValidationError::NonFinite { field: "depth_km" });
    }
    if !raw.magnitude.is_finite() {
        return Err(ValidationError::NonFinite { field: "magnitude" });
    }
    if !(-90.0..=90.0).contains(&raw.latitude) {
        return Err(ValidationError::LatitudeOutOfRange {
            value: raw.latitude,
        });
    }
    if !(-180.0..=180.0).contains(&raw.longitude) {
        return Err(ValidationError::LongitudeOutOfRange {
            value: raw.longitude,
        });
    }
    if raw.depth_km < 0.0 {
        return Err(ValidationError::NegativeDepth {
            value: raw.depth_km,
        });
    }
    if !(0.0..=MAX_VALID_MAGNITUDE).contains(&raw.magnitude) {
        return Err(ValidationError::MagnitudeOutOfRange {
            value: raw.magnitude,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use quake_forecast_geography_models::{Bin, BinBounds};

    fn single_bin_store(config: StoreConfig) -> HistoricalStore {
        let bins = vec![Bin {
            id: 0,
            name: "Test Cell".to_string(),
            bounds: BinBounds::new(120.0, 121.0, 14.0, 15.0),
            locations: Vec::new(),
        }];
        let spatial = Arc::new(SpatialIndex::from_bins(&bins));
        HistoricalStore::new(spatial, config)
    }

    fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn raw(timestamp: DateTime<Utc>, magnitude: f64) -> RawEvent {
        RawEvent {
            timestamp,
            latitude: 14.5,
            longitude: 120.5,
            depth_km: 10.0,
            magnitude,
            place_name: "Manila".to_string(),
        }
    }

    #[test]
    fn ingest_assigns_bin_and_query_returns_event_once() {
        let store = single_bin_store(StoreConfig::default());
        let stored = store.ingest(raw(ts(2024, 1, 15), 4.5)).unwrap();
        assert_eq!(stored.bin_id, Some(0));

        let results = store.query(&EventQuery {
            bin_id: Some(0),
            ..EventQuery::default()
        });
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], stored);
    }

    #[test]
    fn event_outside_every_bin_is_stored_unassigned() {
        let store = single_bin_store(StoreConfig::default());
        let stored = store
            .ingest(RawEvent {
                latitude: 40.0,
                longitude: -70.0,
                ..raw(ts(2024, 1, 1), 3.0)
            })
            .unwrap();
        assert_eq!(stored.bin_id, None);
        assert!(store.query(&EventQuery {
            bin_id: Some(0),
            ..EventQuery::default()
        })
        .is_empty());
    }

    #[test]
    fn malformed_events_are_rejected_without_storing() {
        let store = single_bin_store(StoreConfig::default());

        let bad_lat = RawEvent {
            latitude: 95.0,
            ..raw(ts(2024, 1, 1), 4.0)
        };
        assert!(matches!(
            store.ingest(bad_lat),
            Err(ValidationError::LatitudeOutOfRange { .. })
        ));

        let bad_lon = RawEvent {
            longitude: 200.0,
            ..raw(ts(2024, 1, 1), 4.0)
        };
        assert!(matches!(
            store.ingest(bad_lon),
            Err(ValidationError::LongitudeOutOfRange { .. })
        ));

        let bad_depth = RawEvent {
            depth_km: -1.0,
            ..raw(ts(2024, 1, 1), 4.0)
        };
        assert!(matches!(
            store.ingest(bad_depth),
            Err(ValidationError::NegativeDepth { .. })
        ));

        let bad_magnitude = raw(ts(2024, 1, 1), 10.5);
        assert!(matches!(
            store.ingest(bad_magnitude),
            Err(ValidationError::MagnitudeOutOfRange { .. })
        ));

        let nan_magnitude = raw(ts(2024, 1, 1), f64::NAN);
        assert!(matches!(
            store.ingest(nan_magnitude),
            Err(ValidationError::NonFinite { field: "magnitude" })
        ));

        assert!(store.is_empty());
    }

    #[test]
    fn batch_with_one_bad_record_stores_nothing() {
        let store = single_bin_store(StoreConfig::default());
        let batch = vec![
            raw(ts(2024, 1, 1), 4.0),
            raw(ts(2024, 1, 2), 11.0),
            raw(ts(2024, 1, 3), 5.0),
        ];
        assert!(store.ingest_batch(batch).is_err());
        assert!(store.is_empty());

        let good = vec![raw(ts(2024, 1, 1), 4.0), raw(ts(2024, 1, 2), 5.0)];
        assert_eq!(store.ingest_batch(good).unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn stats_for_empty_bin_year_is_zero_not_error() {
        let store = single_bin_store(StoreConfig::default());
        let stats = store.stats(0, 2024);
        assert_eq!(stats.max_magnitude, None);
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn stats_aggregate_one_calendar_year() {
        let store = single_bin_store(StoreConfig::default());
        store.ingest(raw(ts(2024, 2, 1), 4.1)).unwrap();
        store.ingest(raw(ts(2024, 6, 10), 5.5)).unwrap();
        store.ingest(raw(ts(2024, 11, 3), 6.2)).unwrap();
        // A neighboring year must not leak in.
        store.ingest(raw(ts(2023, 12, 31), 7.9)).unwrap();

        let stats = store.stats(0, 2024);
        assert_eq!(stats.count, 3);
        assert!((stats.max_magnitude.unwrap() - 6.2).abs() < f64::EPSILON);
    }

    #[test]
    fn default_ordering_is_newest_first() {
        let store = single_bin_store(StoreConfig::default());
        store.ingest(raw(ts(2023, 5, 1), 4.0)).unwrap();
        store.ingest(raw(ts(2024, 5, 1), 4.5)).unwrap();
        store.ingest(raw(ts(2022, 5, 1), 5.0)).unwrap();

        let results = store.query(&EventQuery::default());
        let years: Vec<i32> = results.iter().map(|e| e.timestamp.year()).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
    }

    #[test]
    fn strongest_first_ordering_sorts_by_magnitude() {
        let store = single_bin_store(StoreConfig::default());
        store.ingest(raw(ts(2024, 1, 1), 4.0)).unwrap();
        store.ingest(raw(ts(2024, 1, 2), 6.1)).unwrap();
        store.ingest(raw(ts(2024, 1, 3), 5.2)).unwrap();

        let results = store.query(&EventQuery {
            ordering: EventOrdering::StrongestFirst,
            ..EventQuery::default()
        });
        let magnitudes: Vec<f64> = results.iter().map(|e| e.magnitude).collect();
        assert_eq!(magnitudes, vec![6.1, 5.2, 4.0]);
    }

    #[test]
    fn pagination_neither_duplicates_nor_skips() {
        let store = single_bin_store(StoreConfig::default());
        for day in 1..=5 {
            store.ingest(raw(ts(2024, 3, day), 4.0)).unwrap();
        }

        let mut seen = Vec::new();
        for page in 0..3 {
            let results = store.query(&EventQuery {
                limit: Some(2),
                offset: page * 2,
                ..EventQuery::default()
            });
            seen.extend(results.into_iter().map(|e| e.id));
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn limit_defaults_and_caps_from_config() {
        let store = single_bin_store(StoreConfig {
            default_limit: 2,
            max_limit: 3,
        });
        for day in 1..=6 {
            store.ingest(raw(ts(2024, 3, day), 4.0)).unwrap();
        }

        assert_eq!(store.query(&EventQuery::default()).len(), 2);
        assert_eq!(
            store
                .query(&EventQuery {
                    limit: Some(100),
                    ..EventQuery::default()
                })
                .len(),
            3
        );
    }

    #[test]
    fn magnitude_filter_returns_all_matches_under_limit() {
        let store = single_bin_store(StoreConfig::default());
        // 250 events, 80 of which reach magnitude 5.0.
        for i in 0u32..250 {
            let magnitude = if i % 25 < 8 { 5.5 } else { 4.0 };
            let timestamp = Utc
                .with_ymd_and_hms(2020 + (i / 60) as i32, 1 + (i % 12), 1 + (i % 28), 0, 0, 0)
                .unwrap();
            store.ingest(raw(timestamp, magnitude)).unwrap();
        }

        let results = store.query(&EventQuery {
            min_magnitude: Some(5.0),
            limit: Some(100),
            ..EventQuery::default()
        });
        assert_eq!(results.len(), 80);
        for pair in results.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let store = single_bin_store(StoreConfig::default());
        store.ingest(raw(ts(2024, 3, 1), 4.0)).unwrap();
        store.ingest(raw(ts(2024, 3, 15), 4.0)).unwrap();
        store.ingest(raw(ts(2024, 4, 1), 4.0)).unwrap();

        let results = store.query(&EventQuery {
            from: Some(ts(2024, 3, 1)),
            to: Some(ts(2024, 3, 15)),
            ..EventQuery::default()
        });
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn summary_reflects_distribution() {
        let store = single_bin_store(StoreConfig::default());
        store.ingest(raw(ts(2023, 1, 1), 4.0)).unwrap();
        store.ingest(raw(ts(2024, 1, 1), 6.0)).unwrap();
        store
            .ingest(RawEvent {
                latitude: 40.0,
                longitude: -70.0,
                ..raw(ts(2024, 2, 1), 5.0)
            })
            .unwrap();

        let summary = store.summary();
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.unassigned_events, 1);
        assert_eq!(summary.events_per_bin.get(&0), Some(&2));
        assert!((summary.min_magnitude.unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((summary.max_magnitude.unwrap() - 6.0).abs() < f64::EPSILON);
        assert!((summary.avg_magnitude.unwrap() - 5.0).abs() < f64::EPSILON);
        assert_eq!(summary.earliest, Some(ts(2023, 1, 1)));
        assert_eq!(summary.latest, Some(ts(2024, 2, 1)));
    }
}
