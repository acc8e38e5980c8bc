//! Storage contracts and their file-backed implementations.
//!
//! Every store is resilient to a damaged backing file: malformed lines are
//! skipped and an unreadable file reads as empty, so gameplay never stops
//! because of the scoreboard.

pub mod history;
pub mod models;
pub mod players;
pub mod words;

pub use history::{FileHistoryStore, MemoryHistoryStore};
pub use players::{FilePlayerStore, MemoryPlayerStore};
pub use words::{FileWordStore, MemoryWordStore};

use std::path::PathBuf;

use anyhow::{Context, Result};

use self::models::{HistoryRecord, PlayerRecord};

/// Supplies candidate words for single player games.
pub trait WordStore: Send + Sync {
    /// Every known word, uppercase.
    fn list_all(&self) -> Result<Vec<String>>;

    /// Add a word to the dictionary. Returns false when the word is
    /// rejected: empty, non-alphabetic, or already present
    /// (case-insensitively).
    fn add(&self, word: &str) -> Result<bool>;
}

/// Persists per-player win/loss counters, keyed by case-insensitive name.
pub trait PlayerStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<PlayerRecord>>;

    fn find_by_name(&self, name: &str) -> Result<Option<PlayerRecord>>;

    /// Upsert by case-insensitive name.
    fn save(&self, record: &PlayerRecord) -> Result<()>;

    /// Record one finished game, creating a zero-stat record when the
    /// player is unknown.
    fn record_result(&self, name: &str, won: bool) -> Result<()>;

    /// Players ordered by [`PlayerRecord::cmp_ranking`].
    fn ranking(&self, limit: Option<usize>) -> Result<Vec<PlayerRecord>>;
}

/// Append-only log of completed matches.
pub trait HistoryStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<HistoryRecord>>;

    fn append(&self, record: &HistoryRecord) -> Result<()>;
}

/// Platform data directory for the game files, created on demand.
pub fn default_data_dir() -> Result<PathBuf> {
    let mut path = dirs::data_dir()
        .context("unable to determine a data directory for this platform")?;
    path.push("gallows");
    std::fs::create_dir_all(&path).context("failed to create gallows data directory")?;
    Ok(path)
}
