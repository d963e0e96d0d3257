#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable spatial bin registry.
//!
//! The registry is the single source of truth for the geographic partition:
//! a fixed table of rectangular bins loaded once at startup from an embedded
//! TOML dataset and never mutated afterwards. A malformed table (duplicate
//! ids, degenerate bounds, no bins at all) is rejected at load time so the
//! process fails before serving a single query.
//!
//! Bins in a table may overlap or leave gaps; resolving a point to a single
//! bin is the spatial index's job, not the registry's.

pub mod datasets;

use quake_forecast_geography_models::{Bin, BinBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a bin table. All of them are fatal: a
/// registry is either fully valid or not constructed.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The TOML table could not be parsed.
    #[error("failed to parse bin table: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table parsed but contains no bins.
    #[error("bin table '{dataset}' contains no bins")]
    Empty {
        /// Dataset name from the table header.
        dataset: String,
    },

    /// Two bins share the same id.
    #[error("bin table '{dataset}' has duplicate bin id {id}")]
    DuplicateId {
        /// Dataset name from the table header.
        dataset: String,
        /// The duplicated id.
        id: u32,
    },

    /// A bin has a zero/negative extent or a non-finite boundary.
    #[error(
        "bin {id} in table '{dataset}' has degenerate bounds \
         (lon {lon_min}..{lon_max}, lat {lat_min}..{lat_max})"
    )]
    DegenerateBounds {
        /// Dataset name from the table header.
        dataset: String,
        /// The offending bin id.
        id: u32,
        /// Western longitude boundary.
        lon_min: f64,
        /// Eastern longitude boundary.
        lon_max: f64,
        /// Southern latitude boundary.
        lat_min: f64,
        /// Northern latitude boundary.
        lat_max: f64,
    },

    /// No embedded dataset is registered under the requested name.
    #[error("unknown partition dataset '{name}'")]
    UnknownDataset {
        /// The requested dataset name.
        name: String,
    },
}

/// One bin entry as written in a partition TOML table.
#[derive(Debug, Deserialize)]
struct BinDef {
    id: u32,
    name: String,
    lon_min: f64,
    lon_max: f64,
    lat_min: f64,
    lat_max: f64,
    #[serde(default)]
    locations: Vec<String>,
}

/// A partition TOML table: header plus bin entries.
#[derive(Debug, Deserialize)]
struct BinTable {
    name: String,
    description: String,
    bins: Vec<BinDef>,
}

/// Aggregate information about a loaded registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    /// Dataset the registry was loaded from.
    pub dataset: String,
    /// Human-readable dataset description.
    pub description: String,
    /// Number of bins in the partition.
    pub bin_count: usize,
    /// Sum of bin areas in square degrees.
    pub total_area: f64,
}

/// The immutable set of bins making up the spatial partition.
///
/// Constructed once, shared via `Arc`, and read without locking.
pub struct BinRegistry {
    dataset: String,
    description: String,
    /// Sorted ascending by bin id.
    bins: Vec<Bin>,
}

impl BinRegistry {
    /// Loads and validates a registry from a partition TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the table fails to parse, is empty,
    /// contains a duplicate bin id, or contains degenerate bounds.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let table: BinTable = toml::de::from_str(toml_str)?;

        if table.bins.is_empty() {
            return Err(RegistryError::Empty {
                dataset: table.name,
            });
        }

        let mut bins = Vec::with_capacity(table.bins.len());
        for def in table.bins {
            let bounds = BinBounds::new(def.lon_min, def.lon_max, def.lat_min, def.lat_max);
            if bounds.is_degenerate() {
                return Err(RegistryError::DegenerateBounds {
                    dataset: table.name,
                    id: def.id,
                    lon_min: def.lon_min,
                    lon_max: def.lon_max,
                    lat_min: def.lat_min,
                    lat_max: def.lat_max,
                });
            }
            bins.push(Bin {
                id: def.id,
                name: def.name,
                bounds,
                locations: def.locations,
            });
        }

        bins.sort_by_key(|bin| bin.id);
        for pair in bins.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(RegistryError::DuplicateId {
                    dataset: table.name,
                    id: pair[0].id,
                });
            }
        }

        log::info!(
            "Loaded partition dataset '{}' with {} bins",
            table.name,
            bins.len()
        );

        Ok(Self {
            dataset: table.name,
            description: table.description,
            bins,
        })
    }

    /// Loads a registered embedded dataset by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDataset`] if no dataset is registered
    /// under `name`, or a validation error if its table is malformed.
    pub fn load(name: &str) -> Result<Self, RegistryError> {
        let toml_str = datasets::dataset_toml(name).ok_or_else(|| RegistryError::UnknownDataset {
            name: name.to_string(),
        })?;
        Self::from_toml_str(toml_str)
    }

    /// Loads the default embedded dataset.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the embedded default table is malformed,
    /// which indicates a development error caught by tests.
    pub fn load_default() -> Result<Self, RegistryError> {
        Self::load(datasets::DEFAULT_DATASET)
    }

    /// All bins, ordered ascending by id.
    #[must_use]
    pub fn all_bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Looks up a bin by id.
    #[must_use]
    pub fn get_bin(&self, id: u32) -> Option<&Bin> {
        self.bins
            .binary_search_by_key(&id, |bin| bin.id)
            .ok()
            .map(|idx| &self.bins[idx])
    }

    /// Number of bins in the partition.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether the registry holds no bins. Always `false` for a
    /// successfully loaded registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Name of the dataset this registry was loaded from.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Aggregate information about the partition.
    #[must_use]
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            dataset: self.dataset.clone(),
            description: self.description.clone(),
            bin_count: self.bins.len(),
            total_area: self.bins.iter().map(Bin::area).sum(),
        }
    }
}
