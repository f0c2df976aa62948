//! Cleaning driver: file in, cleaned file out
//!
//! Wires the lazy [`FixStream`] through the [`TripMachine`] into a
//! [`TripWriter`], one row at a time. Each file gets its own stream, filter
//! and state machine, so files never influence each other.

use crate::config::TripConfig;
use crate::discover::expand_input_path;
use crate::export::{compute_output_path, TripWriter};
use crate::parser::{FixRecord, FixStream};
use crate::trip::TripMachine;
use crate::types::{EnrichedFix, RunTotals, TripSummary};
use crate::{Result, TripError};
use csv::StringRecord;
use log::{error, info, warn};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Result of cleaning one file
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary: TripSummary,
    /// Rows dropped by the filter or the decoder
    pub dropped: u64,
    pub rows_written: u64,
    pub summary_json: Option<PathBuf>,
}

/// Result of cleaning every file behind one input path
#[derive(Debug, Default)]
pub struct CleanRun {
    pub totals: RunTotals,
    pub reports: Vec<CleanReport>,
    pub failures: Vec<(PathBuf, TripError)>,
}

impl CleanRun {
    pub fn attempted(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Clean a trip from any reader into any writer.
///
/// Returns the trip summary, the rows dropped and the rows written, plus
/// the writer back once flushed.
pub fn clean_reader<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &TripConfig,
) -> Result<(TripSummary, u64, u64, W)> {
    let stream = FixStream::from_reader(reader, config)?;
    let writer = TripWriter::from_writer(writer, stream.headers(), stream.columns().clone())?;
    clean_stream(stream, writer, config)
}

fn clean_stream<R: Read, W: Write>(
    mut stream: FixStream<R>,
    mut writer: TripWriter<W>,
    config: &TripConfig,
) -> Result<(TripSummary, u64, u64, W)> {
    let mut machine = TripMachine::from_config(config);
    let mut last_emitted: Option<(StringRecord, EnrichedFix)> = None;

    for item in stream.by_ref() {
        let FixRecord { record, fix } = item?;
        if let Some(row) = machine.push(fix) {
            writer.write_row(&record, &row)?;
            if config.repeat_last_row {
                last_emitted = Some((record, row));
            }
        }
    }

    // Legacy output repeated the final row once; it is not counted again
    if let Some((record, row)) = &last_emitted {
        writer.write_row(record, row)?;
    }

    let rows_written = writer.rows_written();
    let inner = writer.into_inner()?;
    Ok((machine.summary(), stream.dropped(), rows_written, inner))
}

/// Clean one file into `output_dir`, keeping its file name.
///
/// The output file is only created once the input header has been
/// validated, and is removed again if cleaning fails part way.
pub fn clean_file(input: &Path, output_dir: &Path, config: &TripConfig) -> Result<CleanReport> {
    let output = compute_output_path(input, output_dir)?;
    let stream = FixStream::open(input, config)?;
    let writer = TripWriter::create(&output, stream.headers(), stream.columns().clone())?;

    let (summary, dropped, rows_written) = match clean_stream(stream, writer, config) {
        Ok((summary, dropped, rows_written, _file)) => (summary, dropped, rows_written),
        Err(e) => {
            if let Err(rm) = fs::remove_file(&output) {
                warn!("cannot remove partial output {}: {}", output.display(), rm);
            }
            return Err(e);
        }
    };

    info!(
        "cleaned {} -> {} ({} readings, {} dropped)",
        input.display(),
        output.display(),
        summary.readings,
        dropped
    );

    let summary_json = if config.json_summary {
        write_json_summary(&summary, input, output_dir)?
    } else {
        None
    };

    Ok(CleanReport {
        input: input.to_path_buf(),
        output,
        summary,
        dropped,
        rows_written,
        summary_json,
    })
}

#[cfg(feature = "json")]
fn write_json_summary(
    summary: &TripSummary,
    input: &Path,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    crate::export::export_summary_json(summary, input, output_dir).map(Some)
}

#[cfg(not(feature = "json"))]
fn write_json_summary(
    _summary: &TripSummary,
    _input: &Path,
    _output_dir: &Path,
) -> Result<Option<PathBuf>> {
    warn!("JSON summary requested but the `json` feature is not enabled");
    Ok(None)
}

/// Clean every trip file named by `input` (file, directory or glob).
///
/// The output directory must already exist. A failing file is recorded in
/// [`CleanRun::failures`] and the run moves on to the next one.
pub fn clean_path(input: &str, output_dir: &Path, config: &TripConfig) -> Result<CleanRun> {
    if !output_dir.is_dir() {
        return Err(TripError::Config(format!(
            "output directory does not exist: {}",
            output_dir.display()
        )));
    }

    let files = expand_input_path(input)?;
    let mut run = CleanRun::default();

    for file in files {
        match clean_file(&file, output_dir, config) {
            Ok(report) => {
                run.totals.add(&report.summary);
                run.reports.push(report);
            }
            Err(e) => {
                error!("failed to clean {}: {}", file.display(), e);
                run.failures.push((file, e));
            }
        }
    }

    Ok(run)
}
