//! Run configuration for the cleaner and the image fetcher
//!
//! Unit-conversion constants and the satellite lock threshold live here as
//! plain values handed to each run, so the same process can clean one file
//! in miles and the next in kilometers.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Miles covered by one degree of longitude at roughly 40 degrees latitude.
pub const MILES_PER_DEGREE: f64 = 53.06;

/// Kilometers covered by one degree of longitude at roughly 40 degrees latitude.
pub const KM_PER_DEGREE: f64 = 85.39;

/// Minimum satellite count before fixes at trip start are trusted.
pub const DEFAULT_MIN_SATS: u32 = 4;

/// Literal written by the logger when a field has no value.
pub const NOT_AVAILABLE: &str = "n/a";

/// Requests allowed per run; kept below the service's 2500/day ceiling.
pub const DEFAULT_QUERY_LIMIT: u32 = 2480;

/// Distance/speed unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Units {
    #[default]
    Miles,
    Kilometers,
}

impl Units {
    /// Scale from planar degrees to real-world distance
    pub fn per_degree(self) -> f64 {
        match self {
            Units::Miles => MILES_PER_DEGREE,
            Units::Kilometers => KM_PER_DEGREE,
        }
    }

    pub fn distance_label(self) -> &'static str {
        match self {
            Units::Miles => "miles",
            Units::Kilometers => "kilometers",
        }
    }

    pub fn speed_label(self) -> &'static str {
        match self {
            Units::Miles => "mph",
            Units::Kilometers => "kmph",
        }
    }
}

/// How the Bearing column is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeadingMode {
    /// Compass bearing relative to true north
    #[default]
    Absolute,
    /// Change from the previous absolute bearing, not wrapped
    Relative,
}

/// Options for cleaning a single trip file
#[derive(Debug, Clone)]
pub struct TripConfig {
    pub units: Units,
    pub heading: HeadingMode,
    pub min_sats: u32,
    pub not_available: String,
    /// Write the final emitted row a second time, as the legacy tool did
    pub repeat_last_row: bool,
    /// Also write `<stem>.summary.json` next to the cleaned file
    pub json_summary: bool,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            units: Units::default(),
            heading: HeadingMode::default(),
            min_sats: DEFAULT_MIN_SATS,
            not_available: NOT_AVAILABLE.to_string(),
            repeat_last_row: false,
            json_summary: false,
        }
    }
}

/// Options for the POI image fetcher
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub query_limit: u32,
    /// Pause after each successful request
    pub throttle: Duration,
    /// Per-request timeout for the HTTP client
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            query_limit: DEFAULT_QUERY_LIMIT,
            throttle: Duration::from_millis(250),
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }
}
