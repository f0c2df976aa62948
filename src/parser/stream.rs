//! Lazy source of filtered, decoded fixes
//!
//! Wraps a `csv::Reader` and pulls one record at a time, so a trip file is
//! never held in memory. Rows rejected by the [`RowFilter`] or failing to
//! decode are dropped here and only show up in the debug log and the
//! dropped-row counter.

use crate::config::TripConfig;
use crate::filters::{RowFilter, RowVerdict};
use crate::parser::columns::ColumnMap;
use crate::types::Fix;
use crate::Result;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A raw row that passed the filter, paired with its decoded fix
#[derive(Debug, Clone)]
pub struct FixRecord {
    pub record: StringRecord,
    pub fix: Fix,
}

/// Finite, non-restartable iterator over accepted rows of one trip file
pub struct FixStream<R: Read> {
    records: StringRecordsIntoIter<R>,
    headers: StringRecord,
    columns: ColumnMap,
    filter: RowFilter,
    line: u64,
    dropped: u64,
}

impl FixStream<File> {
    pub fn open(path: &Path, config: &TripConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}

impl<R: Read> FixStream<R> {
    pub fn from_reader(reader: R, config: &TripConfig) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = ColumnMap::from_headers(&headers)?;

        Ok(Self {
            records: reader.into_records(),
            headers,
            columns,
            filter: RowFilter::from_config(config),
            line: 1,
            dropped: 0,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Rows discarded so far by the filter or the decoder
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn drop_row(&mut self, reason: &str) {
        self.dropped += 1;
        debug!("line {}: dropped ({})", self.line, reason);
    }
}

impl<R: Read> Iterator for FixStream<R> {
    type Item = Result<FixRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => {
                    self.line += 1;
                    if let csv::ErrorKind::Utf8 { .. } = err.kind() {
                        self.drop_row("invalid UTF-8");
                        continue;
                    }
                    return Some(Err(err.into()));
                }
            };
            self.line += 1;

            if record.len() < self.columns.width {
                self.drop_row("short row");
                continue;
            }

            match self.filter.check(&record, self.columns.num_sat) {
                RowVerdict::Accept => {}
                RowVerdict::NotAvailable => {
                    self.drop_row("field not available");
                    continue;
                }
                RowVerdict::NoLock => {
                    self.drop_row("no satellite lock yet");
                    continue;
                }
                RowVerdict::Malformed => {
                    self.drop_row("unreadable satellite count");
                    continue;
                }
            }

            match self.columns.decode(&record) {
                Ok(fix) => return Some(Ok(FixRecord { record, fix })),
                Err(err) => {
                    let reason = err.to_string();
                    self.drop_row(&reason);
                }
            }
        }
    }
}
