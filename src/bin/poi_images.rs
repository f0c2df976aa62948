//! `poi_images`: fetch a street-level photo for each POI in a capture
//!
//! Stops at the request quota or on the first error response from the
//! image service.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::Path;
use trip_prep::{fetch_capture_file, FetchConfig, HttpImageSource, RunTotals, StopReason};

fn build_command() -> Command {
    Command::new("poi_images")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Get an image for each POI lat/lng position.\n\
             Stops at the request quota or if the server returns an error.",
        )
        .arg(
            Arg::new("capture")
                .short('c')
                .long("capture")
                .help("Capture CSV filename")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("image")
                .short('i')
                .long("image")
                .help("Directory to store images")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .help("Street View API key (default: $STREETVIEW_API_KEY)")
                .value_name("KEY"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    let level = if matches.get_flag("debug") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let capture = matches
        .get_one::<String>("capture")
        .context("capture file is required")?;
    let image_dir = matches
        .get_one::<String>("image")
        .context("image directory is required")?;

    if !Path::new(capture).is_file() {
        eprintln!("Specified capture file does not exist: {capture}");
        std::process::exit(1);
    }
    if !Path::new(image_dir).is_dir() {
        eprintln!("Specified image directory does not exist: {image_dir}");
        std::process::exit(1);
    }

    let config = FetchConfig {
        api_key: matches
            .get_one::<String>("api-key")
            .cloned()
            .or_else(|| std::env::var("STREETVIEW_API_KEY").ok()),
        ..FetchConfig::default()
    };

    let mut source = HttpImageSource::new(config.timeout).context("building HTTP client")?;
    let report = fetch_capture_file(Path::new(capture), Path::new(image_dir), &mut source, &config)
        .with_context(|| format!("fetching images for {capture}"))?;

    match report.stop {
        StopReason::Completed => {}
        StopReason::QuotaReached => {
            println!("Stopping due to query limit ({}) reached.", config.query_limit)
        }
        StopReason::RemoteError(status) => {
            println!("Stopping due to error response ({status}) from the image service.")
        }
    }

    let totals = RunTotals {
        files: 1,
        readings: report.readings,
        pois: report.pois,
    };
    println!("{totals}");

    if let StopReason::RemoteError(_) = report.stop {
        std::process::exit(1);
    }
    Ok(())
}
