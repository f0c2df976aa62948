//! Row filtering rules applied before a row is decoded
//!
//! Two rules decide whether a raw row may reach the trip state machine:
//!
//! - every field must hold a value (no "not available" sentinel)
//! - at the start of a trip, the receiver must have reached satellite lock
//!
//! Lock is only required once. After the first row passes, later rows with
//! fewer satellites are kept, since a temporary drop (tunnels, overpasses)
//! does not make the position useless.

use crate::config::TripConfig;
use crate::parser::columns::parse_num_sats;
use csv::StringRecord;

/// Outcome of filtering one raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVerdict {
    Accept,
    /// A field held the sentinel value
    NotAvailable,
    /// Trip start, satellite count below the lock threshold
    NoLock,
    /// Trip start, satellite count not a number
    Malformed,
}

impl RowVerdict {
    pub fn is_accepted(self) -> bool {
        self == RowVerdict::Accept
    }
}

/// Stateful per-file row filter
///
/// Holds the "still at trip beginning" flag, so one instance must be used
/// for exactly one file (or [`RowFilter::reset`] between files).
#[derive(Debug, Clone)]
pub struct RowFilter {
    min_sats: u32,
    not_available: String,
    at_beginning: bool,
}

impl RowFilter {
    pub fn new(min_sats: u32, not_available: impl Into<String>) -> Self {
        Self {
            min_sats,
            not_available: not_available.into(),
            at_beginning: true,
        }
    }

    pub fn from_config(config: &TripConfig) -> Self {
        Self::new(config.min_sats, config.not_available.clone())
    }

    /// Whether satellite lock has not been seen yet
    pub fn at_beginning(&self) -> bool {
        self.at_beginning
    }

    pub fn reset(&mut self) {
        self.at_beginning = true;
    }

    /// Judge one row; `num_sat_column` is the NumSat index from the header
    pub fn check(&mut self, record: &StringRecord, num_sat_column: usize) -> RowVerdict {
        if record.iter().any(|field| field.trim() == self.not_available) {
            return RowVerdict::NotAvailable;
        }

        if self.at_beginning {
            let sats = match record.get(num_sat_column).map(parse_num_sats) {
                Some(Ok(sats)) => sats,
                _ => return RowVerdict::Malformed,
            };
            if sats < self.min_sats {
                return RowVerdict::NoLock;
            }
            self.at_beginning = false;
        }

        RowVerdict::Accept
    }
}
