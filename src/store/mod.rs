//! CSV-backed snapshot persistence.

use crate::config::Config;
use crate::error::{Result, WatchError};
use crate::models::{Field, PropertyRecord, Snapshot};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Snapshot table stored as one UTF-8 CSV file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(config: &Config) -> Self {
        Self::at(config.data_path.clone())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot, or `None` when no file exists yet
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot file yet");
                return Ok(None);
            }
            Err(e) => return Err(self.error(e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.error(e))?;

        let headers = reader.headers().map_err(|e| self.error(e))?.clone();
        if !headers.iter().any(|h| h == Field::Id.as_str()) {
            return Err(self.error("missing id column"));
        }

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<PropertyRecord>().enumerate() {
            let record = result.map_err(|e| self.error(e))?;
            if record.id.as_str().is_empty() {
                return Err(self.error(format!("row {} has an empty id", row + 1)));
            }
            records.push(record);
        }

        let captured_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        debug!(path = %self.path.display(), count = records.len(), "Loaded snapshot");
        Ok(Some(Snapshot::with_capture_time(records, captured_at)))
    }

    /// Replace the file with `snapshot`, header row first. Rows go to a
    /// sibling temp file that is renamed over the old snapshot, so a failed
    /// write leaves the previous file intact.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
            }
        }

        let tmp = self.temp_path();
        if let Err(e) = self.write_rows(&tmp, snapshot) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        std::fs::rename(&tmp, &self.path).map_err(|e| self.error(e))?;

        debug!(path = %self.path.display(), count = snapshot.len(), "Saved snapshot");
        Ok(())
    }

    fn write_rows(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| self.error(e))?;

        writer
            .write_record(Field::ALL.iter().map(|f| f.as_str()))
            .map_err(|e| self.error(e))?;
        for record in snapshot.records() {
            writer.serialize(record).map_err(|e| self.error(e))?;
        }
        writer.flush().map_err(|e| self.error(e))?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn error(&self, reason: impl ToString) -> WatchError {
        WatchError::Store {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
