#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial bin geometry and metadata types.
//!
//! A bin is a fixed axis-aligned rectangular cell in WGS84 coordinates,
//! used as the unit of spatial aggregation for historical events and
//! forecasts. Bins are defined once at startup by the registry in
//! `quake_forecast_geography` and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Rectangular bounds of a spatial bin in WGS84 degrees.
///
/// Containment is inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinBounds {
    /// Western longitude boundary.
    pub lon_min: f64,
    /// Eastern longitude boundary.
    pub lon_max: f64,
    /// Southern latitude boundary.
    pub lat_min: f64,
    /// Northern latitude boundary.
    pub lat_max: f64,
}

impl BinBounds {
    /// Creates bounds from the given boundaries.
    #[must_use]
    pub const fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Whether the point lies inside these bounds (edges inclusive).
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        longitude >= self.lon_min
            && longitude <= self.lon_max
            && latitude >= self.lat_min
            && latitude <= self.lat_max
    }

    /// Midpoint of the bounds as `(latitude, longitude)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.lat_min, self.lat_max),
            f64::midpoint(self.lon_min, self.lon_max),
        )
    }

    /// Longitudinal span in degrees.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitudinal span in degrees.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Whether the rectangle is unusable: zero or negative extent on
    /// either axis, or any non-finite boundary.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.lon_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_min.is_finite()
            && self.lat_max.is_finite())
            || self.lon_min >= self.lon_max
            || self.lat_min >= self.lat_max
    }
}

/// A fixed rectangular cell in the spatial partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Stable identifier, used as a public key by clients.
    pub id: u32,
    /// Human-readable bin name.
    pub name: String,
    /// Rectangular boundary.
    pub bounds: BinBounds,
    /// Place names covered by this bin (informational only).
    pub locations: Vec<String>,
}

impl Bin {
    /// Midpoint of the bin's bounds as `(latitude, longitude)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        self.bounds.center()
    }

    /// Area of the bin in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.bounds.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_midpoint_of_bounds() {
        let bounds = BinBounds::new(120.0, 121.0, 14.0, 15.0);
        let (lat, lon) = bounds.center();
        assert!((lat - 14.5).abs() < f64::EPSILON);
        assert!((lon - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn area_is_product_of_side_lengths() {
        let bounds = BinBounds::new(120.0, 121.5, 14.0, 15.0);
        assert!((bounds.area() - 1.5).abs() < 1e-12);
        assert!((bounds.width() - 1.5).abs() < 1e-12);
        assert!((bounds.height() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn containment_is_edge_inclusive() {
        let bounds = BinBounds::new(120.0, 121.0, 14.0, 15.0);
        assert!(bounds.contains(14.5, 120.5));
        assert!(bounds.contains(14.0, 120.0));
        assert!(bounds.contains(15.0, 121.0));
        assert!(!bounds.contains(15.0001, 120.5));
        assert!(!bounds.contains(14.5, 119.9999));
    }

    #[test]
    fn degenerate_bounds_detected() {
        assert!(BinBounds::new(121.0, 120.0, 14.0, 15.0).is_degenerate());
        assert!(BinBounds::new(120.0, 120.0, 14.0, 15.0).is_degenerate());
        assert!(BinBounds::new(120.0, 121.0, 15.0, 15.0).is_degenerate());
        assert!(BinBounds::new(f64::NAN, 121.0, 14.0, 15.0).is_degenerate());
        assert!(!BinBounds::new(120.0, 121.0, 14.0, 15.0).is_degenerate());
    }
}
