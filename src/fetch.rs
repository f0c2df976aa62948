//! Street-level imagery for points of interest
//!
//! Replays a capture file and, for every row flagged as a POI, requests a
//! 640x640 street-level photo looking along the direction of travel (the
//! bearing from the previously seen position to the POI). The run stops as
//! a whole on the first non-success response or when the request quota is
//! used up; images already written are kept.

use crate::config::FetchConfig;
use crate::geo::bearing;
use crate::parser::columns::{COL_LAT, COL_LNG, COL_POI, COL_TIMESTAMP};
use crate::{Result, TripError};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Street View static image endpoint
pub const STREETVIEW_BASE_URL: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Build the request URL for one POI.
///
/// Image size, field of view and pitch are fixed; coordinates are passed
/// through exactly as they appear in the capture file.
pub fn streetview_url(lat: &str, lng: &str, heading: i32, api_key: Option<&str>) -> String {
    let mut url = format!(
        "{}?size=640x640&fov=90&pitch=0&heading={}&location={},{}",
        STREETVIEW_BASE_URL, heading, lat, lng
    );
    if let Some(key) = api_key {
        url.push_str("&key=");
        url.push_str(key);
    }
    url
}

/// File name for a fetched image: `{row id}_{heading}.jpg`
pub fn image_file_name(row_id: &str, heading: i32) -> String {
    format!("{}_{}.jpg", row_id, heading)
}

/// What the image service answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    Image(Vec<u8>),
    /// Non-success HTTP status
    Rejected(u16),
}

/// Anything that can turn a request URL into image bytes
pub trait ImageSource {
    fn fetch(&mut self, url: &str) -> Result<FetchResponse>;
}

/// Blocking HTTP image source
#[cfg(feature = "fetch")]
pub struct HttpImageSource {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpImageSource {
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "fetch")]
impl ImageSource for HttpImageSource {
    fn fetch(&mut self, url: &str) -> Result<FetchResponse> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Ok(FetchResponse::Rejected(status.as_u16()));
        }
        Ok(FetchResponse::Image(resp.bytes()?.to_vec()))
    }
}

/// Why a fetch run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every row of the capture was read
    Completed,
    QuotaReached,
    /// The service answered with this non-success status
    RemoteError(u16),
}

/// Outcome of one fetch run
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Data rows read before the run ended
    pub readings: u64,
    pub pois: u64,
    pub requests: u32,
    pub images: Vec<PathBuf>,
    pub stop: StopReason,
}

struct CaptureColumns {
    timestamp: usize,
    lat: usize,
    lng: usize,
    poi: usize,
}

impl CaptureColumns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TripError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            timestamp: find(COL_TIMESTAMP)?,
            lat: find(COL_LAT)?,
            lng: find(COL_LNG)?,
            poi: find(COL_POI)?,
        })
    }
}

/// Fetch one image per POI row of a capture file
pub fn fetch_capture_file<S: ImageSource>(
    capture: &Path,
    image_dir: &Path,
    source: &mut S,
    config: &FetchConfig,
) -> Result<FetchReport> {
    if !image_dir.is_dir() {
        return Err(TripError::Config(format!(
            "image directory does not exist: {}",
            image_dir.display()
        )));
    }
    let file = File::open(capture)?;
    fetch_poi_images(file, image_dir, source, config)
}

/// Fetch one image per POI row read from `reader`
pub fn fetch_poi_images<R: Read, S: ImageSource>(
    reader: R,
    image_dir: &Path,
    source: &mut S,
    config: &FetchConfig,
) -> Result<FetchReport> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = CaptureColumns::from_headers(reader.headers()?)?;

    let mut report = FetchReport {
        readings: 0,
        pois: 0,
        requests: 0,
        images: Vec::new(),
        stop: StopReason::Completed,
    };
    let mut last_seen: Option<(f64, f64)> = None;

    for record in reader.records() {
        let record = record?;
        report.readings += 1;

        let (lat_raw, lng_raw) = match (record.get(columns.lat), record.get(columns.lng)) {
            (Some(lat), Some(lng)) => (lat.trim(), lng.trim()),
            _ => continue,
        };
        let position = match (lat_raw.parse::<f64>(), lng_raw.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => (lat, lng),
            _ => {
                debug!("row {}: no usable position, skipped", report.readings);
                continue;
            }
        };

        let is_poi = record
            .get(columns.poi)
            .map(|marker| !marker.trim().is_empty())
            .unwrap_or(false);

        if is_poi {
            report.pois += 1;
            let (from_lat, from_lng) = last_seen.unwrap_or(position);
            let heading = bearing(from_lat, from_lng, position.0, position.1);
            let url = streetview_url(lat_raw, lng_raw, heading, config.api_key.as_deref());
            debug!("heading {} for POI at {},{}", heading, lat_raw, lng_raw);

            match source.fetch(&url)? {
                FetchResponse::Rejected(status) => {
                    warn!("image service answered {}, stopping", status);
                    report.stop = StopReason::RemoteError(status);
                    return Ok(report);
                }
                FetchResponse::Image(bytes) => {
                    let row_id = record.get(columns.timestamp).unwrap_or("row").trim();
                    let path = image_dir.join(image_file_name(row_id, heading));
                    fs::write(&path, &bytes)?;
                    info!("saved {}", path.display());
                    report.images.push(path);
                }
            }

            report.requests += 1;
            if report.requests >= config.query_limit {
                warn!("request quota of {} reached, stopping", config.query_limit);
                report.stop = StopReason::QuotaReached;
                return Ok(report);
            }
            if !config.throttle.is_zero() {
                std::thread::sleep(config.throttle);
            }
        }

        last_seen = Some(position);
    }

    Ok(report)
}
