use crate::config::Units;
use crate::types::fix::Fix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mutable per-file state of the trip state machine
///
/// Created when a file is opened and dropped (or summarized) when it is
/// exhausted. Nothing in here outlives one file.
#[derive(Debug, Clone, Default)]
pub struct TripState {
    /// Last accepted fix; `None` until the first valid row seeds the trip
    pub last_fix: Option<Fix>,
    /// Absolute bearing toward `last_fix`, used as the base in relative mode
    pub last_bearing: i32,
    pub total_distance: f64,
    /// Seconds between the seed fix and the last accepted fix
    pub total_elapsed: i64,
    /// Emitted rows; the seed fix is not counted
    pub readings: u64,
    pub pois: u64,
    pub peak_speed: f64,
    /// Sum of per-row speeds, the numerator of the average speed
    pub speed_sum: f64,
}

/// Final figures for one cleaned file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TripSummary {
    pub units: Units,
    pub total_distance: f64,
    pub total_hours: f64,
    /// Mean of per-row speeds, not distance over time
    pub average_speed: f64,
    pub peak_speed: f64,
    pub readings: u64,
    pub pois: u64,
}

impl TripSummary {
    pub fn from_state(state: &TripState, units: Units) -> Self {
        let average_speed = if state.readings > 0 {
            state.speed_sum / state.readings as f64
        } else {
            0.0
        };

        Self {
            units,
            total_distance: state.total_distance,
            total_hours: state.total_elapsed as f64 / 3600.0,
            average_speed,
            peak_speed: state.peak_speed,
            readings: state.readings,
            pois: state.pois,
        }
    }
}

/// Counts aggregated over every file of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunTotals {
    pub files: usize,
    pub readings: u64,
    pub pois: u64,
}

impl RunTotals {
    pub fn add(&mut self, summary: &TripSummary) {
        self.files += 1;
        self.readings += summary.readings;
        self.pois += summary.pois;
    }
}
