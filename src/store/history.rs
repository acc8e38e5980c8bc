//! Append-only match history backed by a pipe-delimited text file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use super::HistoryStore;
use super::models::HistoryRecord;

const FILE_HEADER: &str = "# history - format: date|player|word|result|attempts|duration";

pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_file()?;
        Ok(store)
    }

    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create history directory")?;
        }
        if !self.path.exists() {
            fs::write(&self.path, format!("{FILE_HEADER}\n"))
                .context("failed to create history file")?;
        }
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read history");
                return Ok(Vec::new());
            }
        };
        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .filter_map(|line| match HistoryRecord::from_line(line) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(line, %err, "skipping malformed history line");
                    None
                }
            })
            .collect())
    }

    fn append(&self, record: &HistoryRecord) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .context("failed to open history for append")?;
        writeln!(file, "{}", record.to_line()).context("failed to append history record")?;
        Ok(())
    }
}

/// In-memory history log for tests.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl HistoryStore for MemoryHistoryStore {
    fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn append(&self, record: &HistoryRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
