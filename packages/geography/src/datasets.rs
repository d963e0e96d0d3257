//! Compile-time registry of spatial partition datasets.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! The partition scheme is a configurable dataset, not hard-coded logic:
//! adding an alternate partition requires creating a TOML file in
//! `datasets/` and a corresponding entry here, nothing else.

/// Name of the dataset used when none is requested explicitly.
pub const DEFAULT_DATASET: &str = "regions";

/// Embedded TOML partition tables.
const DATASET_TOMLS: &[(&str, &str)] = &[
    ("regions", include_str!("../datasets/regions.toml")),
    ("quadtree", include_str!("../datasets/quadtree.toml")),
];

/// Returns the embedded TOML table for a dataset, if one is registered.
#[must_use]
pub fn dataset_toml(name: &str) -> Option<&'static str> {
    DATASET_TOMLS
        .iter()
        .find(|(dataset, _)| *dataset == name)
        .map(|(_, toml_str)| *toml_str)
}

/// Names of all registered datasets, in registration order.
#[must_use]
pub fn dataset_names() -> Vec<&'static str> {
    DATASET_TOMLS.iter().map(|(name, _)| *name).collect()
}
