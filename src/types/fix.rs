#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One timestamped GPS sample decoded from an input row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    /// Seconds since the Unix epoch, UTC, sub-second part dropped
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Carried through to the output; not used by any computation
    pub altitude: Option<f64>,
    pub num_sats: u32,
    /// Point of interest: the marker column was non-empty
    pub poi: bool,
}

/// A fix accepted by the trip state machine, with values derived from the
/// previously accepted fix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnrichedFix {
    pub fix: Fix,
    /// Distance from the previous fix in the configured unit
    pub distance: f64,
    /// Seconds since the previous fix, always > 0
    pub elapsed: i64,
    /// Distance per hour in the configured unit
    pub speed: f64,
    /// Absolute heading in [0, 360), or an unwrapped turn in relative mode
    pub bearing: i32,
}
