//! Word dictionary backed by a plain text file, one word per line.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use super::WordStore;

/// Seed dictionary written on first run.
const DEFAULT_WORDS: &[&str] = &[
    "RUST",
    "PROGRAMMING",
    "COMPUTER",
    "DEVELOPER",
    "ALGORITHM",
    "ARCHITECTURE",
    "ENGINEERING",
    "SOFTWARE",
    "HARDWARE",
    "INTERNET",
    "TECHNOLOGY",
    "INTELLIGENCE",
    "ARTIFICIAL",
    "MACHINE",
    "LEARNING",
    "DATABASE",
    "FRAMEWORK",
    "LIBRARY",
    "INTERFACE",
    "BACKEND",
    "FRONTEND",
    "FULLSTACK",
    "SERVER",
    "CLIENT",
    "PROTOCOL",
    "SECURITY",
    "CRYPTOGRAPHY",
    "COMPILER",
    "INTERPRETER",
    "DEBUGGER",
];

pub struct FileWordStore {
    path: PathBuf,
}

impl FileWordStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_file()?;
        Ok(store)
    }

    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create word list directory")?;
        }
        if !self.path.exists() {
            let mut seed = DEFAULT_WORDS.join("\n");
            seed.push('\n');
            fs::write(&self.path, seed).context("failed to seed word list")?;
        }
        Ok(())
    }
}

impl WordStore for FileWordStore {
    fn list_all(&self) -> Result<Vec<String>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read word list");
                return Ok(Vec::new());
            }
        };
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_alphabetic()))
            .map(str::to_uppercase)
            .collect())
    }

    fn add(&self, word: &str) -> Result<bool> {
        let word = word.trim().to_uppercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(false);
        }
        if self.list_all()?.contains(&word) {
            return Ok(false);
        }

        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .context("failed to open word list for append")?;
        writeln!(file, "{word}").context("failed to append word")?;
        Ok(true)
    }
}

/// In-memory dictionary for tests.
#[derive(Default)]
pub struct MemoryWordStore {
    words: Mutex<Vec<String>>,
}

impl MemoryWordStore {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: Mutex::new(words.iter().map(|w| w.to_uppercase()).collect()),
        }
    }
}

impl WordStore for MemoryWordStore {
    fn list_all(&self) -> Result<Vec<String>> {
        Ok(self.words.lock().unwrap().clone())
    }

    fn add(&self, word: &str) -> Result<bool> {
        let word = word.trim().to_uppercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(false);
        }
        let mut words = self.words.lock().unwrap();
        if words.contains(&word) {
            return Ok(false);
        }
        words.push(word);
        Ok(true)
    }
}
