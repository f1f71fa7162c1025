use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
};

use crate::error::SinkError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// `<timestamp> - <line>`, e.g. `2024-05-01 12:00:00,042 - 3 Request: 200 OK`.
#[must_use]
pub fn format_log_line(timestamp: &DateTime<Local>, line: &str) -> String {
    format!("{} - {}", timestamp.format(TIMESTAMP_FORMAT), line)
}

/// Appends timestamped lines to a persistent log file.
#[derive(Debug)]
pub struct LogFileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogFileSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| SinkError::OpenLogFile {
                path: path.clone(),
                source: err,
            })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Buffers one line stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns an error when the buffered write fails.
    pub async fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let mut entry = format_log_line(&Local::now(), line);
        entry.push('\n');
        self.writer
            .write_all(entry.as_bytes())
            .await
            .map_err(|err| SinkError::WriteLogFile {
                path: self.path.clone(),
                source: err,
            })
    }

    /// # Errors
    ///
    /// Returns an error when the buffered lines cannot be written out.
    pub async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer
            .flush()
            .await
            .map_err(|err| SinkError::WriteLogFile {
                path: self.path.clone(),
                source: err,
            })
    }
}
