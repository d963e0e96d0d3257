#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Seismic risk tier taxonomy.
//!
//! This crate defines the canonical four-tier risk classification used
//! across the entire quake-forecast system, together with the magnitude
//! thresholds it derives from. Every component that reports a risk level
//! classifies through [`RiskLevel::from_magnitude`] so the thresholds live
//! in exactly one place.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lowest magnitude classified as medium risk.
pub const MEDIUM_MAGNITUDE_FLOOR: f64 = 5.0;

/// Lowest magnitude classified as high risk.
pub const HIGH_MAGNITUDE_FLOOR: f64 = 6.0;

/// Lowest magnitude classified as critical risk.
pub const CRITICAL_MAGNITUDE_FLOOR: f64 = 7.0;

/// Risk tier for a spatial bin, from 1 (low) to 4 (critical).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Expected maximum magnitude below 5.0.
    Low = 1,
    /// Expected maximum magnitude in \[5.0, 6.0).
    Medium = 2,
    /// Expected maximum magnitude in \[6.0, 7.0).
    High = 3,
    /// Expected maximum magnitude of 7.0 or above.
    Critical = 4,
}

impl RiskLevel {
    /// Returns the numeric rank of this tier (1-4).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Classifies a maximum magnitude into a risk tier.
    ///
    /// Each tier is inclusive on its lower bound: 5.0 is medium, 6.0 is
    /// high, 7.0 is critical. Anything below 5.0 (including the 0.0
    /// convention for bins with no recorded events) is low.
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= CRITICAL_MAGNITUDE_FLOOR {
            Self::Critical
        } else if magnitude >= HIGH_MAGNITUDE_FLOOR {
            Self::High
        } else if magnitude >= MEDIUM_MAGNITUDE_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Whether this tier warrants close monitoring (high or critical).
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    /// Returns all variants of this enum, lowest tier first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}
