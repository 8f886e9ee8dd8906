use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::{RecordSink, SinkError};
use crate::domain::Record;

/// Appends records as rows of a CSV file, one row per commit.
///
/// The header row is written only when the file is new or empty. Rows are
/// never rewritten or deduplicated.
pub struct CsvRecordSink {
    path: PathBuf,
}

impl CsvRecordSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvRecordSink {
    fn append(&self, record: &Record) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SinkError::Unavailable(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        let is_empty = file
            .metadata()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(is_empty).from_writer(file);
        writer.serialize(record).map_err(|e| SinkError::Write(e.to_string()))?;
        writer.flush().map_err(|e| SinkError::Write(e.to_string()))?;

        debug!(path = %self.path.display(), header = is_empty, "row appended");
        Ok(())
    }
}
