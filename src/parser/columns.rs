//! Header-driven column lookup and row decoding
//!
//! Trip logs are addressed by column name, never by position, so extra
//! columns or a different order in the logger's header are carried through.

use crate::parser::timestamp::parse_timestamp;
use crate::types::Fix;
use crate::{Result, TripError};
use csv::StringRecord;

pub const COL_TIMESTAMP: &str = "TimeStamp";
pub const COL_LAT: &str = "Lat";
pub const COL_LNG: &str = "Lng";
pub const COL_ALTITUDE: &str = "Altitude";
pub const COL_NUM_SAT: &str = "NumSat";
pub const COL_POI: &str = "POI";
pub const COL_SPEED: &str = "Speed";
pub const COL_BEARING: &str = "Bearing";

/// Pre-computed column indices for one file's header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: usize,
    pub lat: usize,
    pub lng: usize,
    pub altitude: Option<usize>,
    pub num_sat: usize,
    pub poi: usize,
    /// Present when the input was already cleaned once
    pub speed: Option<usize>,
    pub bearing: Option<usize>,
    pub width: usize,
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| TripError::MissingColumn(name.to_string()));

        Ok(Self {
            timestamp: require(COL_TIMESTAMP)?,
            lat: require(COL_LAT)?,
            lng: require(COL_LNG)?,
            altitude: find(COL_ALTITUDE),
            num_sat: require(COL_NUM_SAT)?,
            poi: require(COL_POI)?,
            speed: find(COL_SPEED),
            bearing: find(COL_BEARING),
            width: headers.len(),
        })
    }

    /// Decode the typed fields of a row that already passed the row filter
    pub fn decode(&self, record: &StringRecord) -> Result<Fix> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .map(str::trim)
                .ok_or_else(|| TripError::Parse(format!("row has no {} field", name)))
        };
        let float = |index: usize, name: &str| -> Result<f64> {
            let raw = field(index, name)?;
            raw.parse::<f64>()
                .map_err(|e| TripError::Parse(format!("{} '{}': {}", name, raw, e)))
        };

        let timestamp = parse_timestamp(field(self.timestamp, COL_TIMESTAMP)?)?;
        let latitude = float(self.lat, COL_LAT)?;
        let longitude = float(self.lng, COL_LNG)?;
        let altitude = self
            .altitude
            .and_then(|i| record.get(i))
            .and_then(|raw| raw.trim().parse::<f64>().ok());
        let num_sats = parse_num_sats(field(self.num_sat, COL_NUM_SAT)?)?;
        let poi = record
            .get(self.poi)
            .map(|marker| !marker.trim().is_empty())
            .unwrap_or(false);

        Ok(Fix {
            timestamp,
            latitude,
            longitude,
            altitude,
            num_sats,
            poi,
        })
    }

    /// Output header: input order, then Speed and Bearing unless the input
    /// already carries them
    pub fn output_headers(&self, headers: &StringRecord) -> StringRecord {
        let mut out = headers.clone();
        if self.speed.is_none() {
            out.push_field(COL_SPEED);
        }
        if self.bearing.is_none() {
            out.push_field(COL_BEARING);
        }
        out
    }

    pub fn speed_index(&self) -> usize {
        self.speed.unwrap_or(self.width)
    }

    pub fn bearing_index(&self) -> usize {
        match (self.bearing, self.speed) {
            (Some(index), _) => index,
            (None, Some(_)) => self.width,
            (None, None) => self.width + 1,
        }
    }

    pub fn output_width(&self) -> usize {
        self.width + usize::from(self.speed.is_none()) + usize::from(self.bearing.is_none())
    }
}

pub fn parse_num_sats(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| TripError::Parse(format!("{} '{}': {}", COL_NUM_SAT, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StringRecord {
        StringRecord::from(vec!["TimeStamp", "Lat", "Lng", "Altitude", "NumSat", "POI"])
    }

    #[test]
    fn test_column_map_from_standard_header() {
        let columns = ColumnMap::from_headers(&header()).unwrap();
        assert_eq!(columns.timestamp, 0);
        assert_eq!(columns.num_sat, 4);
        assert_eq!(columns.poi, 5);
        assert_eq!(columns.altitude, Some(3));
        assert_eq!(columns.speed, None);
        assert_eq!(columns.speed_index(), 6);
        assert_eq!(columns.bearing_index(), 7);
        assert_eq!(columns.output_width(), 8);
    }

    #[test]
    fn test_column_map_reordered_header() {
        let headers = StringRecord::from(vec!["POI", "NumSat", "Lng", "Lat", "TimeStamp"]);
        let columns = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(columns.poi, 0);
        assert_eq!(columns.lat, 3);
        assert_eq!(columns.altitude, None);
    }

    #[test]
    fn test_column_map_missing_column() {
        let headers = StringRecord::from(vec!["TimeStamp", "Lat", "Lng", "NumSat"]);
        match ColumnMap::from_headers(&headers) {
            Err(TripError::MissingColumn(name)) => assert_eq!(name, "POI"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_cleaned_header_reuses_speed_and_bearing() {
        let headers = StringRecord::from(vec![
            "TimeStamp", "Lat", "Lng", "Altitude", "NumSat", "POI", "Speed", "Bearing",
        ]);
        let columns = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(columns.speed_index(), 6);
        assert_eq!(columns.bearing_index(), 7);
        assert_eq!(columns.output_width(), 8);
        assert_eq!(columns.output_headers(&headers), headers);
    }

    #[test]
    fn test_decode_row() {
        let columns = ColumnMap::from_headers(&header()).unwrap();
        let record = StringRecord::from(vec![
            "2018-06-23T01:25:04.700Z",
            "37.54856569",
            "-122.302331958",
            "23.326",
            "10",
            "POI",
        ]);
        let fix = columns.decode(&record).unwrap();
        assert_eq!(fix.timestamp, 1_529_717_104);
        assert_eq!(fix.latitude, 37.54856569);
        assert_eq!(fix.longitude, -122.302331958);
        assert_eq!(fix.altitude, Some(23.326));
        assert_eq!(fix.num_sats, 10);
        assert!(fix.poi);
    }

    #[test]
    fn test_decode_empty_poi_marker() {
        let columns = ColumnMap::from_headers(&header()).unwrap();
        let record =
            StringRecord::from(vec!["2018-06-23T01:25:04.700Z", "37.5", "-122.3", "23", "10", ""]);
        assert!(!columns.decode(&record).unwrap().poi);
    }

    #[test]
    fn test_decode_bad_latitude() {
        let columns = ColumnMap::from_headers(&header()).unwrap();
        let record =
            StringRecord::from(vec!["2018-06-23T01:25:04.700Z", "north", "-122.3", "23", "10", ""]);
        assert!(matches!(columns.decode(&record), Err(TripError::Parse(_))));
    }
}
