//! Player scoreboard backed by a pipe-delimited text file.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use super::PlayerStore;
use super::models::PlayerRecord;

const FILE_HEADER: &str = "# scoreboard - format: name|wins|losses";

pub struct FilePlayerStore {
    path: PathBuf,
}

impl FilePlayerStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_file()?;
        Ok(store)
    }

    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create scoreboard directory")?;
        }
        if !self.path.exists() {
            fs::write(&self.path, format!("{FILE_HEADER}\n"))
                .context("failed to create scoreboard file")?;
        }
        Ok(())
    }

    fn parse_line(line: &str) -> Option<PlayerRecord> {
        let parts: Vec<&str> = line.trim().split('|').collect();
        if parts.len() != 3 {
            return None;
        }
        Some(PlayerRecord {
            name: parts[0].trim().to_string(),
            wins: parts[1].trim().parse().ok()?,
            losses: parts[2].trim().parse().ok()?,
        })
    }

    fn read_all(&self) -> Vec<PlayerRecord> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read scoreboard");
                return Vec::new();
            }
        };
        text.lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let record = Self::parse_line(line);
                if record.is_none() {
                    warn!(line, "skipping malformed scoreboard line");
                }
                record
            })
            .collect()
    }

    fn write_all(&self, records: &[PlayerRecord]) -> Result<()> {
        let mut text = format!("{FILE_HEADER}\n");
        for record in records {
            text.push_str(&format!(
                "{}|{}|{}\n",
                record.name, record.wins, record.losses
            ));
        }
        fs::write(&self.path, text).context("failed to write scoreboard")
    }
}

impl PlayerStore for FilePlayerStore {
    fn list_all(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.read_all())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<PlayerRecord>> {
        let name = name.trim();
        Ok(self
            .read_all()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    fn save(&self, record: &PlayerRecord) -> Result<()> {
        let mut all = self.read_all();
        match all
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&record.name))
        {
            Some(existing) => *existing = record.clone(),
            None => all.push(record.clone()),
        }
        self.write_all(&all)
    }

    fn record_result(&self, name: &str, won: bool) -> Result<()> {
        let mut record = self
            .find_by_name(name)?
            .unwrap_or_else(|| PlayerRecord::new(name));
        if won {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
        self.save(&record)
    }

    fn ranking(&self, limit: Option<usize>) -> Result<Vec<PlayerRecord>> {
        let mut all = self.read_all();
        all.sort_by(|a, b| a.cmp_ranking(b));
        if let Some(limit) = limit {
            all.truncate(limit);
        }
        Ok(all)
    }
}

/// In-memory scoreboard for tests.
#[derive(Default)]
pub struct MemoryPlayerStore {
    records: Mutex<Vec<PlayerRecord>>,
}

impl PlayerStore for MemoryPlayerStore {
    fn list_all(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<PlayerRecord>> {
        let name = name.trim().to_string();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&name))
            .cloned())
    }

    fn save(&self, record: &PlayerRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        match records
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&record.name))
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    fn record_result(&self, name: &str, won: bool) -> Result<()> {
        let mut record = self
            .find_by_name(name)?
            .unwrap_or_else(|| PlayerRecord::new(name));
        if won {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
        self.save(&record)
    }

    fn ranking(&self, limit: Option<usize>) -> Result<Vec<PlayerRecord>> {
        let mut all = self.list_all()?;
        all.sort_by(|a, b| a.cmp_ranking(b));
        if let Some(limit) = limit {
            all.truncate(limit);
        }
        Ok(all)
    }
}
