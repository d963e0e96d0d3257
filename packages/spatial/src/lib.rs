#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for bin assignment.
//!
//! Maps a (latitude, longitude) point to the owning bin id. Bins may
//! overlap or leave gaps, so a point can match zero, one, or several bins;
//! overlaps are resolved deterministically in favor of the most specific
//! cell: smallest area wins, ties broken by smallest id. A point outside
//! every bin is unassigned, never snapped to a neighbor.
//!
//! Built once from the registry and shared read-only. An R-tree prunes
//! candidate bins, but the contract is O(bins) per assignment in the worst
//! case (fully overlapping tables degenerate to a scan).

use quake_forecast_geography_models::{Bin, BinBounds};
use rstar::{AABB, RTree, RTreeObject};

/// A bin rectangle stored in the R-tree with its tie-break metadata.
struct BinEntry {
    id: u32,
    area: f64,
    bounds: BinBounds,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for BinEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built point-to-bin assignment index.
pub struct SpatialIndex {
    bins: RTree<BinEntry>,
}

impl SpatialIndex {
    /// Builds the index from the registry's bins.
    #[must_use]
    pub fn from_bins(bins: &[Bin]) -> Self {
        let entries = bins
            .iter()
            .map(|bin| BinEntry {
                id: bin.id,
                area: bin.area(),
                bounds: bin.bounds,
                envelope: AABB::from_corners(
                    [bin.bounds.lon_min, bin.bounds.lat_min],
                    [bin.bounds.lon_max, bin.bounds.lat_max],
                ),
            })
            .collect();

        log::debug!("Built spatial index over {} bins", bins.len());

        Self {
            bins: RTree::bulk_load(entries),
        }
    }

    /// Assigns a point to the owning bin id, or `None` if the point lies
    /// outside every bin.
    ///
    /// Containment is inclusive on bin edges. When several bins contain the
    /// point, the smallest-area bin wins; equal areas fall back to the
    /// smallest id.
    #[must_use]
    pub fn assign(&self, latitude: f64, longitude: f64) -> Option<u32> {
        let query_env = AABB::from_point([longitude, latitude]);

        let mut best: Option<&BinEntry> = None;

        for entry in self.bins.locate_in_envelope_intersecting(&query_env) {
            if !entry.bounds.contains(latitude, longitude) {
                continue;
            }
            best = match best {
                None => Some(entry),
                Some(current)
                    if entry.area < current.area
                        || (entry.area == current.area && entry.id < current.id) =>
                {
                    Some(entry)
                }
                Some(current) => Some(current),
            };
        }

        best.map(|entry| entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(id: u32, lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Bin {
        Bin {
            id,
            name: format!("Bin {id}"),
            bounds: BinBounds::new(lon_min, lon_max, lat_min, lat_max),
            locations: Vec::new(),
        }
    }

    #[test]
    fn point_inside_single_bin_is_assigned_to_it() {
        let index = SpatialIndex::from_bins(&[
            bin(1, 120.0, 121.0, 14.0, 15.0),
            bin(2, 122.0, 123.0, 14.0, 15.0),
        ]);
        assert_eq!(index.assign(14.5, 120.5), Some(1));
        assert_eq!(index.assign(14.5, 122.5), Some(2));
    }

    #[test]
    fn point_outside_all_bins_is_unassigned() {
        let index = SpatialIndex::from_bins(&[bin(1, 120.0, 121.0, 14.0, 15.0)]);
        assert_eq!(index.assign(20.0, 130.0), None);
        assert_eq!(index.assign(-14.5, 120.5), None);
    }

    #[test]
    fn bin_edges_are_inclusive() {
        let index = SpatialIndex::from_bins(&[bin(1, 120.0, 121.0, 14.0, 15.0)]);
        assert_eq!(index.assign(14.0, 120.0), Some(1));
        assert_eq!(index.assign(15.0, 121.0), Some(1));
    }

    #[test]
    fn overlap_resolves_to_smaller_area() {
        // Bin 2 covers bin 3's northern half with three times the area.
        let index = SpatialIndex::from_bins(&[
            bin(2, 120.0, 121.5, 14.0, 16.0),
            bin(3, 120.0, 121.0, 14.0, 15.0),
        ]);
        assert_eq!(index.assign(14.5, 120.5), Some(3));
        // Outside bin 3 but still inside bin 2.
        assert_eq!(index.assign(15.5, 120.5), Some(2));
    }

    #[test]
    fn equal_area_overlap_resolves_to_smaller_id() {
        let index = SpatialIndex::from_bins(&[
            bin(9, 120.0, 121.0, 14.0, 15.0),
            bin(4, 120.5, 121.5, 14.0, 15.0),
        ]);
        // Point inside both unit-degree bins.
        assert_eq!(index.assign(14.5, 120.75), Some(4));
    }

    #[test]
    fn shared_edge_belongs_to_smaller_id_when_areas_equal() {
        let index = SpatialIndex::from_bins(&[
            bin(1, 120.0, 121.0, 14.0, 15.0),
            bin(2, 121.0, 122.0, 14.0, 15.0),
        ]);
        assert_eq!(index.assign(14.5, 121.0), Some(1));
    }
}
