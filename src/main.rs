//! `trip_prep`: clean raw GPS trip logs
//!
//! Drops incomplete rows and warm-up rows without satellite lock, then
//! writes each trip back out with epoch timestamps plus Speed and Bearing.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use std::path::Path;
use trip_prep::{clean_path, HeadingMode, TripConfig, Units, DEFAULT_MIN_SATS};

fn build_command() -> Command {
    Command::new("trip_prep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prepare raw GPS data files: drop bad fixes, add speed and heading.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print a trip summary for each file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("absolute")
                .short('a')
                .long("absolute")
                .help("Calculate absolute heading in degrees")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("relative")
                .short('r')
                .long("relative")
                .help("Calculate relative heading (change from previous heading) in degrees")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("kmph")
                .short('k')
                .long("kmph")
                .help("Calculate speed in km/hour. Default is miles/hour")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("in")
                .short('i')
                .long("in")
                .help("Input file, directory (searched recursively for .csv files) or glob pattern")
                .value_name("PATH")
                .required(true),
        )
        .arg(
            Arg::new("outdir")
                .short('o')
                .long("outdir")
                .help("Place cleaned-up file(s) in this directory (default: current directory)")
                .value_name("DIR")
                .default_value("."),
        )
        .arg(
            Arg::new("min-sats")
                .long("min-sats")
                .help("Satellite count required before fixes at trip start are kept")
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .default_value("4"),
        )
        .arg(
            Arg::new("repeat-last-row")
                .long("repeat-last-row")
                .help("Write the final row twice, matching the output of the legacy tool")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Also write <name>.summary.json for each file (needs the `json` feature)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging, including every dropped row")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn heading_mode(matches: &ArgMatches) -> Option<HeadingMode> {
    match (matches.get_flag("absolute"), matches.get_flag("relative")) {
        (true, false) => Some(HeadingMode::Absolute),
        (false, true) => Some(HeadingMode::Relative),
        _ => None,
    }
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));
    debug!(
        "trip_prep {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );

    let heading = match heading_mode(&matches) {
        Some(heading) => heading,
        None => {
            eprintln!("Must pick either absolute (-a) or relative (-r).");
            std::process::exit(1);
        }
    };

    let output_dir = matches
        .get_one::<String>("outdir")
        .map(String::as_str)
        .unwrap_or(".");
    if !Path::new(output_dir).is_dir() {
        eprintln!("Specified output directory does not exist: {output_dir}");
        std::process::exit(1);
    }

    let input = matches
        .get_one::<String>("in")
        .context("input path is required")?;
    let is_pattern = input.contains('*') || input.contains('?') || input.contains('[');
    if !is_pattern && !Path::new(input).exists() {
        eprintln!("Specified input path does not exist: {input}");
        std::process::exit(1);
    }

    let config = TripConfig {
        units: if matches.get_flag("kmph") {
            Units::Kilometers
        } else {
            Units::Miles
        },
        heading,
        min_sats: matches
            .get_one::<u32>("min-sats")
            .copied()
            .unwrap_or(DEFAULT_MIN_SATS),
        repeat_last_row: matches.get_flag("repeat-last-row"),
        json_summary: matches.get_flag("json"),
        ..TripConfig::default()
    };
    let verbose = matches.get_flag("verbose");

    let run = match clean_path(input, Path::new(output_dir), &config) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for report in &run.reports {
        if verbose {
            let filename = report
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");
            println!("Processing: {filename}");
            println!("{}", report.summary);
            println!();
        }
        if let Some(json) = &report.summary_json {
            println!("Exported summary to: {}", json.display());
        }
    }

    for (path, e) in &run.failures {
        eprintln!("Error processing {}: {e}", path.display());
    }

    println!("{}", run.totals);

    if run.reports.is_empty() && !run.failures.is_empty() {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            run.attempted()
        );
        std::process::exit(1);
    }

    Ok(())
}
