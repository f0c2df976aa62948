//! Export of cleaned trip data
//!
//! Contains the enriched-row CSV writer and the optional JSON summary
//! export, plus the helper that decides where output files land.

use crate::parser::columns::ColumnMap;
use crate::types::EnrichedFix;
use crate::{Result, TripError};
use csv::{StringRecord, Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(feature = "json")]
use crate::types::TripSummary;

/// Output path for a cleaned file: same file name, inside `output_dir`
///
/// Refuses to return the input path itself, which would truncate the file
/// being read.
pub fn compute_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input_path.file_name().ok_or_else(|| {
        TripError::Config(format!("input path has no file name: {}", input_path.display()))
    })?;
    let output_path = output_dir.join(file_name);

    let same_file = match (input_path.canonicalize(), output_path.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same_file {
        return Err(TripError::Config(format!(
            "output would overwrite input file: {}",
            input_path.display()
        )));
    }

    Ok(output_path)
}

/// Row-at-a-time writer for enriched trip rows
pub struct TripWriter<W: Write> {
    writer: Writer<W>,
    columns: ColumnMap,
    rows: u64,
}

impl TripWriter<File> {
    pub fn create(path: &Path, headers: &StringRecord, columns: ColumnMap) -> Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(file, headers, columns)
    }
}

impl<W: Write> TripWriter<W> {
    /// Wrap `inner` and write the output header straight away
    pub fn from_writer(inner: W, headers: &StringRecord, columns: ColumnMap) -> Result<Self> {
        let mut writer = WriterBuilder::new().flexible(false).from_writer(inner);
        writer.write_record(&columns.output_headers(headers))?;
        Ok(Self {
            writer,
            columns,
            rows: 0,
        })
    }

    /// Write one row: the input fields with TimeStamp rewritten as epoch
    /// seconds, and Speed/Bearing filled in
    pub fn write_row(&mut self, record: &StringRecord, row: &EnrichedFix) -> Result<()> {
        let width = self.columns.output_width();
        let mut fields: Vec<String> = record
            .iter()
            .take(self.columns.width)
            .map(str::to_string)
            .collect();
        fields.resize(width, String::new());

        fields[self.columns.timestamp] = row.fix.timestamp.to_string();
        fields[self.columns.speed_index()] = row.speed.to_string();
        fields[self.columns.bearing_index()] = row.bearing.to_string();

        self.writer.write_record(&fields)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| TripError::Export(e.to_string()))
    }
}

/// Write `summary` as pretty JSON to `<output_dir>/<stem>.summary.json`
#[cfg(feature = "json")]
pub fn export_summary_json(
    summary: &TripSummary,
    input_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trip");
    let path = output_dir.join(format!("{stem}.summary.json"));
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(path)
}
