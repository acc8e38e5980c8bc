//! Record types persisted by the stores.

use std::cmp::Ordering;
use std::fmt;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::session::GameSession;

/// Date format used in the history file.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchResult::Win => "WIN",
            MatchResult::Loss => "LOSS",
        };
        write!(f, "{}", s)
    }
}

impl MatchResult {
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "WIN" => Some(MatchResult::Win),
            "LOSS" => Some(MatchResult::Loss),
            _ => None,
        }
    }

    pub fn is_win(self) -> bool {
        matches!(self, MatchResult::Win)
    }
}

/// Win/loss tally for one named player.
///
/// Names are compared case-insensitively wherever records are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            wins: 0,
            losses: 0,
        }
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of games won; 0 when the player never played.
    pub fn win_rate(&self) -> f64 {
        if self.total_games() == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.total_games()) * 100.0
    }

    /// Ranking order: wins descending, ties broken by win rate descending.
    pub fn cmp_ranking(&self, other: &Self) -> Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then_with(|| {
                other
                    .win_rate()
                    .partial_cmp(&self.win_rate())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}W/{}L ({:.1}%)",
            self.name,
            self.wins,
            self.losses,
            self.win_rate()
        )
    }
}

/// Immutable summary of one completed match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: NaiveDateTime,
    pub player_name: String,
    pub word: String,
    pub result: MatchResult,
    pub attempts_used: u32,
    pub duration_seconds: i64,
}

impl HistoryRecord {
    /// Derive the record for a finished session.
    pub fn from_session(session: &GameSession) -> Self {
        // Truncate to whole seconds so the record survives the file codec.
        let date = session.started_at().naive_utc();
        let date = date.with_nanosecond(0).unwrap_or(date);
        Self {
            date,
            player_name: session.player_name().to_string(),
            word: session.word().to_string(),
            result: if session.is_won() {
                MatchResult::Win
            } else {
                MatchResult::Loss
            },
            attempts_used: session.wrong_attempts(),
            duration_seconds: session.duration_seconds(),
        }
    }

    /// Encode as one pipe-delimited history file line.
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.date.format(DATE_FORMAT),
            self.player_name,
            self.word,
            self.result,
            self.attempts_used,
            self.duration_seconds
        )
    }

    /// Parse one history file line.
    pub fn from_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.trim().split('|').collect();
        if parts.len() != 6 {
            bail!("malformed history line: {line:?}");
        }
        Ok(Self {
            date: NaiveDateTime::parse_from_str(parts[0], DATE_FORMAT)
                .context("bad date field")?,
            player_name: parts[1].to_string(),
            word: parts[2].to_string(),
            result: MatchResult::from_string(parts[3]).context("bad result field")?,
            attempts_used: parts[4].parse().context("bad attempts field")?,
            duration_seconds: parts[5].parse().context("bad duration field")?,
        })
    }
}

/// Two records describe the same match when player, word and date agree.
impl PartialEq for HistoryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.player_name == other.player_name
            && self.word == other.word
            && self.date == other.date
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {} wrong | {}s",
            self.date.format(DATE_FORMAT),
            self.player_name,
            self.word,
            self.result,
            self.attempts_used,
            self.duration_seconds
        )
    }
}
