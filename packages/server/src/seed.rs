//! Embedded seed catalog.
//!
//! A small PHIVOLCS-derived sample of historical events ingested at startup
//! so the API answers real data before any external feed is wired up. Each
//! entry is `(timestamp, latitude, longitude, depth_km, magnitude, place)`.

use chrono::{DateTime, Utc};
use quake_forecast_store::HistoricalStore;
use quake_forecast_store_models::RawEvent;

const SEED_EVENTS: &[(&str, f64, f64, f64, f64, &str)] = &[
    ("2024-01-15T10:30:00Z", 14.5995, 120.9842, 45.2, 4.5, "Manila Bay Area"),
    ("2024-01-14T15:20:00Z", 16.4023, 120.5960, 67.8, 3.8, "Baguio City Area"),
    ("2024-01-13T08:45:00Z", 13.7563, 121.0583, 23.4, 5.2, "Laguna Lake Area"),
    ("2024-01-12T14:15:00Z", 15.2500, 120.5833, 35.0, 4.1, "La Union Area"),
    ("2024-01-11T09:30:00Z", 17.5000, 121.0000, 50.5, 4.5, "Cagayan Valley"),
    ("2023-12-01T10:30:00Z", 14.5995, 120.9842, 10.5, 4.2, "Manila, Philippines"),
    ("2023-12-05T15:45:00Z", 16.4023, 120.5960, 25.0, 5.8, "Baguio, Philippines"),
    ("2023-12-10T08:15:00Z", 15.1448, 120.5974, 15.2, 6.1, "Angeles, Philippines"),
];

/// Materializes the embedded catalog as raw events.
///
/// # Panics
///
/// Panics if an embedded timestamp fails to parse. These are compile-time
/// constants, so a failure indicates a development error caught by tests.
#[must_use]
pub fn seed_events() -> Vec<RawEvent> {
    SEED_EVENTS
        .iter()
        .map(|&(timestamp, latitude, longitude, depth_km, magnitude, place_name)| RawEvent {
            timestamp: timestamp
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|e| panic!("Invalid seed timestamp '{timestamp}': {e}")),
            latitude,
            longitude,
            depth_km,
            magnitude,
            place_name: place_name.to_string(),
        })
        .collect()
}

/// Ingests the embedded catalog into the store.
///
/// # Panics
///
/// Panics if the embedded catalog fails validation, which indicates a
/// development error caught by tests.
pub fn seed_store(store: &HistoricalStore) -> u64 {
    store
        .ingest_batch(seed_events())
        .expect("Embedded seed catalog failed validation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quake_forecast_geography::BinRegistry;
    use quake_forecast_spatial::SpatialIndex;
    use quake_forecast_store::StoreConfig;

    #[test]
    fn seed_catalog_parses_and_validates() {
        let events = seed_events();
        assert_eq!(events.len(), SEED_EVENTS.len());

        let registry = BinRegistry::load_default().unwrap();
        let spatial = Arc::new(SpatialIndex::from_bins(registry.all_bins()));
        let store = HistoricalStore::new(spatial, StoreConfig::default());
        assert_eq!(seed_store(&store), SEED_EVENTS.len() as u64);
    }

    #[test]
    fn seed_events_cover_multiple_bins() {
        let registry = BinRegistry::load_default().unwrap();
        let spatial = SpatialIndex::from_bins(registry.all_bins());

        let assigned: std::collections::BTreeSet<u32> = seed_events()
            .iter()
            .filter_map(|event| spatial.assign(event.latitude, event.longitude))
            .collect();
        assert!(assigned.len() > 1, "seed catalog only covers {assigned:?}");
    }
}
