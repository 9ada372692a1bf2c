//! Persisting period batches.
//!
//! A workbook is named after the year and holds one sheet per month. The CSV
//! sink maps that onto the filesystem as `<root>/<year>/<month>.csv`.

use ledgerscan_core::COLUMNS;
use log::info;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::period::PeriodBatch;

pub trait PeriodSink {
    /// Write one period as a new sheet and return where it went.
    fn write_period(&mut self, batch: &PeriodBatch) -> Result<PathBuf, SinkError>;
}

/// Year directories of month CSV sheets. Existing sheets are never
/// overwritten; a clashing sheet gets a numeric suffix (`Nov1.csv`).
#[derive(Debug, Clone)]
pub struct CsvWorkbookSink {
    root: PathBuf,
}

impl CsvWorkbookSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvWorkbookSink { root: root.into() }
    }

    pub fn workbook_dir(&self, year: &str) -> PathBuf {
        self.root.join(year)
    }

    /// Claim the first free sheet name with a `create_new` open.
    fn open_new_sheet(workbook: &Path, month: &str) -> Result<(PathBuf, File), SinkError> {
        let mut n = 0usize;
        loop {
            let path = match n {
                0 => workbook.join(format!("{month}.csv")),
                n => workbook.join(format!("{month}{n}.csv")),
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(source) => return Err(SinkError::Io { path, source }),
            }
        }
    }
}

impl PeriodSink for CsvWorkbookSink {
    fn write_period(&mut self, batch: &PeriodBatch) -> Result<PathBuf, SinkError> {
        let workbook = self.workbook_dir(&batch.key.year);
        fs::create_dir_all(&workbook).map_err(|source| SinkError::Io {
            path: workbook.clone(),
            source,
        })?;

        let (path, file) = Self::open_new_sheet(&workbook, &batch.key.month)?;
        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record(COLUMNS)?;
        for record in &batch.records {
            wtr.write_record(record.to_row())?;
        }
        wtr.flush().map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;

        info!("{}: {} row(s) written to {}", batch.key, batch.records.len(), path.display());
        Ok(path)
    }
}
