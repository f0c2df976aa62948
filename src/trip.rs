//! Trip state machine
//!
//! Consumes the filtered fixes of one file in order and derives distance,
//! elapsed time, speed and bearing against the previously accepted fix.
//!
//! - The first fix only seeds the state; nothing is emitted for it.
//! - A fix whose timestamp is not after the last accepted one is dropped,
//!   the earlier fix stays. Equal seconds would make elapsed time zero.
//! - A fix whose elapsed time (or the running total) does not fit in an
//!   `i64` is dropped the same way.
//! - Relative bearings are measured against the previous *absolute*
//!   bearing and are not wrapped, so they may be negative or exceed 359.

use crate::config::{HeadingMode, TripConfig, Units};
use crate::geo::{bearing, planar_distance};
use crate::types::{EnrichedFix, Fix, TripState, TripSummary};
use log::debug;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Streaming reducer owning one file's [`TripState`]
#[derive(Debug, Clone)]
pub struct TripMachine {
    units: Units,
    heading: HeadingMode,
    state: TripState,
}

impl TripMachine {
    pub fn new(units: Units, heading: HeadingMode) -> Self {
        Self {
            units,
            heading,
            state: TripState::default(),
        }
    }

    pub fn from_config(config: &TripConfig) -> Self {
        Self::new(config.units, config.heading)
    }

    pub fn state(&self) -> &TripState {
        &self.state
    }

    /// Feed the next accepted fix; returns the enriched row to emit, if any
    pub fn push(&mut self, fix: Fix) -> Option<EnrichedFix> {
        if self.state.last_fix.is_none() {
            debug!("trip seeded at t={}", fix.timestamp);
            self.state.last_fix = Some(fix);
            return None;
        }
        let last = self.state.last_fix.as_ref()?;

        if fix.timestamp <= last.timestamp {
            debug!(
                "t={} not after last accepted fix t={}, dropped",
                fix.timestamp, last.timestamp
            );
            return None;
        }

        let elapsed = fix.timestamp.checked_sub(last.timestamp);
        let total = elapsed.and_then(|e| self.state.total_elapsed.checked_add(e));
        let (Some(elapsed), Some(total_elapsed)) = (elapsed, total) else {
            debug!(
                "t={} too far from last accepted fix t={}, dropped",
                fix.timestamp, last.timestamp
            );
            return None;
        };

        let distance = self.units.per_degree()
            * planar_distance(last.latitude, last.longitude, fix.latitude, fix.longitude);
        let speed = distance * SECONDS_PER_HOUR / elapsed as f64;
        let absolute = bearing(last.latitude, last.longitude, fix.latitude, fix.longitude);
        let heading = match self.heading {
            HeadingMode::Absolute => absolute,
            HeadingMode::Relative => absolute - self.state.last_bearing,
        };

        let state = &mut self.state;
        state.total_distance += distance;
        state.total_elapsed = total_elapsed;
        state.readings += 1;
        if fix.poi {
            state.pois += 1;
        }
        state.speed_sum += speed;
        if speed > state.peak_speed {
            state.peak_speed = speed;
        }
        state.last_bearing = absolute;
        state.last_fix = Some(fix.clone());

        Some(EnrichedFix {
            fix,
            distance,
            elapsed,
            speed,
            bearing: heading,
        })
    }

    pub fn summary(&self) -> TripSummary {
        TripSummary::from_state(&self.state, self.units)
    }
}
