//! GPS Trip Preparation Library
//!
//! Cleans raw GPS trip logs and derives per-reading speed and heading.
//! A companion fetcher downloads a street-level photo for every point of
//! interest in a capture.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `trip_prep` and `poi_images` binaries
//! - **`fetch`** (default): Blocking HTTP image source for the POI fetcher
//! - **`serde`**: Enable serialization/deserialization of types
//! - **`json`**: Write a per-file summary as JSON next to the cleaned CSV
//!
//! # Quick Start
//!
//! Clean one trip file:
//! ```rust,no_run
//! use trip_prep::{clean_file, TripConfig};
//! use std::path::Path;
//!
//! let report = clean_file(Path::new("drive.csv"), Path::new("cleaned"), &TripConfig::default()).unwrap();
//! println!("{}", report.summary);
//! ```
//!
//! Drive the state machine directly:
//! ```rust
//! use trip_prep::{Fix, HeadingMode, TripMachine, Units};
//!
//! let mut machine = TripMachine::new(Units::Miles, HeadingMode::Absolute);
//! let fix = |timestamp, longitude| Fix {
//!     timestamp,
//!     latitude: 37.0,
//!     longitude,
//!     altitude: None,
//!     num_sats: 10,
//!     poi: false,
//! };
//! assert!(machine.push(fix(0, -122.0)).is_none());
//! let row = machine.push(fix(1, -121.999)).unwrap();
//! assert!(row.speed > 0.0);
//! ```
//!
//! # Pipeline
//!
//! raw rows → [`RowFilter`] → [`TripMachine`] → [`TripWriter`] / [`TripSummary`]
//!
//! [`FixStream`] runs the first stage lazily over a `csv::Reader`;
//! [`clean_reader`], [`clean_file`] and [`clean_path`] run the whole chain.

pub mod clean;
pub mod config;
pub mod discover;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filters;
pub mod geo;
pub mod parser;
pub mod summary;
pub mod trip;
pub mod types;

pub use clean::*;
pub use config::*;
pub use discover::*;
pub use error::*;
pub use export::*;
pub use fetch::*;
pub use filters::*;
pub use geo::*;
pub use parser::*;
pub use summary::*;
pub use trip::*;
pub use types::*;
