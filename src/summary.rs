//! Human-readable trip reports

use crate::types::{RunTotals, TripSummary};
use std::fmt;

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let speed = self.units.speed_label();
        writeln!(
            f,
            "Total distance covered: {:.2} {}; in {:.2} hours",
            self.total_distance,
            self.units.distance_label(),
            self.total_hours
        )?;
        writeln!(f, "Average speed: {:5.2} {}", self.average_speed, speed)?;
        writeln!(f, "Peak    speed: {:5.2} {}", self.peak_speed, speed)?;
        writeln!(f, "Total Valid Readings: {}", self.readings)?;
        write!(f, "Total POIs: {}", format_thousands(self.pois))
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total GPS Readings: {}. Total POIs: {}.",
            format_thousands(self.readings),
            self.pois
        )
    }
}

/// Group digits in threes with commas, e.g. `12345` -> `12,345`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
