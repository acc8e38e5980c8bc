//! Read-side statistics over the player and history stores.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::store::models::{HistoryRecord, PlayerRecord};
use crate::store::{HistoryStore, PlayerStore};

/// Aggregates over the whole match history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub average_attempts: f64,
    pub average_duration: f64,
}

/// Aggregates filtered to one player.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerStats {
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub average_attempts: f64,
    /// The winning record with the fewest attempts used, if any.
    pub best_performance: Option<HistoryRecord>,
}

/// Derives rankings and summary statistics. Pure reads, no caching.
pub struct StatsAggregator {
    players: Arc<dyn PlayerStore>,
    history: Arc<dyn HistoryStore>,
}

impl StatsAggregator {
    pub fn new(players: Arc<dyn PlayerStore>, history: Arc<dyn HistoryStore>) -> Self {
        Self { players, history }
    }

    /// Statistics over the full history; all zeros when it is empty.
    pub fn global_stats(&self) -> Result<GlobalStats> {
        let records = self.history.list_all()?;
        if records.is_empty() {
            return Ok(GlobalStats::default());
        }

        let total = records.len();
        let wins = records.iter().filter(|r| r.result.is_win()).count();
        let attempts: u32 = records.iter().map(|r| r.attempts_used).sum();
        let duration: i64 = records.iter().map(|r| r.duration_seconds).sum();

        Ok(GlobalStats {
            total_games: total,
            wins,
            losses: total - wins,
            win_rate: wins as f64 / total as f64 * 100.0,
            average_attempts: f64::from(attempts) / total as f64,
            average_duration: duration as f64 / total as f64,
        })
    }

    /// Statistics for one player, matched case-insensitively.
    pub fn player_stats(&self, name: &str) -> Result<PlayerStats> {
        let name = name.trim();
        let records: Vec<HistoryRecord> = self
            .history
            .list_all()?
            .into_iter()
            .filter(|r| r.player_name.eq_ignore_ascii_case(name))
            .collect();
        if records.is_empty() {
            return Ok(PlayerStats::default());
        }

        let total = records.len();
        let wins = records.iter().filter(|r| r.result.is_win()).count();
        let attempts: u32 = records.iter().map(|r| r.attempts_used).sum();
        let best_performance = records
            .iter()
            .filter(|r| r.result.is_win())
            .min_by_key(|r| r.attempts_used)
            .cloned();

        Ok(PlayerStats {
            total_games: total,
            wins,
            losses: total - wins,
            win_rate: wins as f64 / total as f64 * 100.0,
            average_attempts: f64::from(attempts) / total as f64,
            best_performance,
        })
    }

    /// Players with at least one game, best first.
    pub fn ranking(&self, limit: Option<usize>) -> Result<Vec<PlayerRecord>> {
        let mut players: Vec<PlayerRecord> = self
            .players
            .list_all()?
            .into_iter()
            .filter(|p| p.total_games() > 0)
            .collect();
        players.sort_by(|a, b| a.cmp_ranking(b));
        if let Some(limit) = limit {
            players.truncate(limit);
        }
        Ok(players)
    }

    /// Best win rate first, considering only players with at least
    /// `min_games` games.
    pub fn top_players_by_win_rate(
        &self,
        limit: usize,
        min_games: u32,
    ) -> Result<Vec<PlayerRecord>> {
        let mut players: Vec<PlayerRecord> = self
            .players
            .list_all()?
            .into_iter()
            .filter(|p| p.total_games() >= min_games)
            .collect();
        players.sort_by(|a, b| {
            b.win_rate()
                .partial_cmp(&a.win_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        players.truncate(limit);
        Ok(players)
    }

    /// 1-indexed position in the full ranking, None when unranked.
    pub fn player_rank(&self, name: &str) -> Result<Option<usize>> {
        let name = name.trim();
        Ok(self
            .ranking(None)?
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
            .map(|i| i + 1))
    }

    /// The top ranked player, if anyone has played.
    pub fn best_player(&self) -> Result<Option<PlayerRecord>> {
        Ok(self.ranking(Some(1))?.into_iter().next())
    }

    pub fn total_players(&self) -> Result<usize> {
        Ok(self.players.list_all()?.len())
    }

    pub fn active_players(&self) -> Result<usize> {
        Ok(self
            .players
            .list_all()?
            .iter()
            .filter(|p| p.total_games() > 0)
            .count())
    }

    /// The most recent matches, newest first.
    pub fn recent_games(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut records = self.history.list_all()?;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        Ok(records)
    }

    /// One player's matches, newest first.
    pub fn player_history(&self, name: &str, limit: usize) -> Result<Vec<HistoryRecord>> {
        let name = name.trim();
        let mut records: Vec<HistoryRecord> = self
            .history
            .list_all()?
            .into_iter()
            .filter(|r| r.player_name.eq_ignore_ascii_case(name))
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        Ok(records)
    }

    /// All wins, optionally filtered to one player.
    pub fn victories(&self, player: Option<&str>) -> Result<Vec<HistoryRecord>> {
        self.filter_by_result(player, true)
    }

    /// All losses, optionally filtered to one player.
    pub fn defeats(&self, player: Option<&str>) -> Result<Vec<HistoryRecord>> {
        self.filter_by_result(player, false)
    }

    fn filter_by_result(&self, player: Option<&str>, won: bool) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .history
            .list_all()?
            .into_iter()
            .filter(|r| r.result.is_win() == won)
            .filter(|r| {
                player
                    .map(|name| r.player_name.eq_ignore_ascii_case(name.trim()))
                    .unwrap_or(true)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::MatchResult;
    use crate::store::{HistoryStore, MemoryHistoryStore, MemoryPlayerStore, PlayerStore};
    use chrono::NaiveDate;

    fn record(player: &str, result: MatchResult, attempts: u32, day: u32) -> HistoryRecord {
        HistoryRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            player_name: player.to_string(),
            word: "CRATE".to_string(),
            result,
            attempts_used: attempts,
            duration_seconds: 60,
        }
    }

    fn aggregator() -> (StatsAggregator, Arc<MemoryPlayerStore>, Arc<MemoryHistoryStore>) {
        let players = Arc::new(MemoryPlayerStore::default());
        let history = Arc::new(MemoryHistoryStore::default());
        let stats = StatsAggregator::new(
            Arc::clone(&players) as Arc<dyn PlayerStore>,
            Arc::clone(&history) as Arc<dyn HistoryStore>,
        );
        (stats, players, history)
    }

    #[test]
    fn test_global_stats_on_empty_history_are_all_zero() {
        let (stats, _, _) = aggregator();
        assert_eq!(stats.global_stats().unwrap(), GlobalStats::default());
    }

    #[test]
    fn test_global_stats_aggregate_wins_and_averages() {
        let (stats, _, history) = aggregator();
        history.append(&record("Alice", MatchResult::Win, 2, 1)).unwrap();
        history.append(&record("Bob", MatchResult::Loss, 6, 2)).unwrap();

        let global = stats.global_stats().unwrap();
        assert_eq!(global.total_games, 2);
        assert_eq!(global.wins, 1);
        assert_eq!(global.losses, 1);
        assert_eq!(global.win_rate, 50.0);
        assert_eq!(global.average_attempts, 4.0);
        assert_eq!(global.average_duration, 60.0);
    }

    #[test]
    fn test_player_stats_filter_case_insensitively() {
        let (stats, _, history) = aggregator();
        history.append(&record("Alice", MatchResult::Win, 3, 1)).unwrap();
        history.append(&record("ALICE", MatchResult::Win, 1, 2)).unwrap();
        history.append(&record("alice", MatchResult::Loss, 6, 3)).unwrap();
        history.append(&record("Bob", MatchResult::Win, 0, 4)).unwrap();

        let alice = stats.player_stats("Alice").unwrap();
        assert_eq!(alice.total_games, 3);
        assert_eq!(alice.wins, 2);
        assert_eq!(alice.losses, 1);
        let best = alice.best_performance.unwrap();
        assert_eq!(best.attempts_used, 1);
    }

    #[test]
    fn test_player_stats_without_wins_have_no_best_performance() {
        let (stats, _, history) = aggregator();
        history.append(&record("Alice", MatchResult::Loss, 6, 1)).unwrap();
        assert!(stats.player_stats("Alice").unwrap().best_performance.is_none());
    }

    #[test]
    fn test_unknown_player_stats_are_all_zero() {
        let (stats, _, _) = aggregator();
        let unknown = stats.player_stats("Nobody").unwrap();
        assert_eq!(unknown.total_games, 0);
        assert_eq!(unknown.win_rate, 0.0);
    }

    #[test]
    fn test_ranking_skips_players_without_games() {
        let (stats, players, _) = aggregator();
        players
            .save(&PlayerRecord {
                name: "A".into(),
                wins: 3,
                losses: 1,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "B".into(),
                wins: 3,
                losses: 2,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "C".into(),
                wins: 1,
                losses: 0,
            })
            .unwrap();
        players.save(&PlayerRecord::new("Idle")).unwrap();

        let names: Vec<String> = stats
            .ranking(None)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert_eq!(stats.ranking(Some(2)).unwrap().len(), 2);
        assert_eq!(stats.total_players().unwrap(), 4);
        assert_eq!(stats.active_players().unwrap(), 3);
        assert_eq!(stats.best_player().unwrap().unwrap().name, "A");
    }

    #[test]
    fn test_top_players_by_win_rate_requires_minimum_games() {
        let (stats, players, _) = aggregator();
        // 100% over 2 games, 80% over 5, 50% over 6, and a lucky one-gamer.
        players
            .save(&PlayerRecord {
                name: "A".into(),
                wins: 2,
                losses: 0,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "B".into(),
                wins: 4,
                losses: 1,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "C".into(),
                wins: 3,
                losses: 3,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "D".into(),
                wins: 1,
                losses: 0,
            })
            .unwrap();

        let names: Vec<String> = stats
            .top_players_by_win_rate(10, 2)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let top = stats.top_players_by_win_rate(1, 5).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "B");
    }

    #[test]
    fn test_player_rank_is_one_indexed() {
        let (stats, players, _) = aggregator();
        players
            .save(&PlayerRecord {
                name: "A".into(),
                wins: 3,
                losses: 0,
            })
            .unwrap();
        players
            .save(&PlayerRecord {
                name: "B".into(),
                wins: 1,
                losses: 0,
            })
            .unwrap();

        assert_eq!(stats.player_rank("a").unwrap(), Some(1));
        assert_eq!(stats.player_rank("B").unwrap(), Some(2));
        assert_eq!(stats.player_rank("Nobody").unwrap(), None);
    }

    #[test]
    fn test_recent_games_are_newest_first() {
        let (stats, _, history) = aggregator();
        history.append(&record("Alice", MatchResult::Win, 1, 1)).unwrap();
        history.append(&record("Bob", MatchResult::Win, 1, 3)).unwrap();
        history.append(&record("Carol", MatchResult::Win, 1, 2)).unwrap();

        let recent = stats.recent_games(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].player_name, "Bob");
        assert_eq!(recent[1].player_name, "Carol");
    }

    #[test]
    fn test_victories_and_defeats_filter_by_player() {
        let (stats, _, history) = aggregator();
        history.append(&record("Alice", MatchResult::Win, 1, 1)).unwrap();
        history.append(&record("Alice", MatchResult::Loss, 6, 2)).unwrap();
        history.append(&record("Bob", MatchResult::Win, 2, 3)).unwrap();

        assert_eq!(stats.victories(None).unwrap().len(), 2);
        assert_eq!(stats.victories(Some("alice")).unwrap().len(), 1);
        assert_eq!(stats.defeats(None).unwrap().len(), 1);
        assert_eq!(stats.defeats(Some("Bob")).unwrap().len(), 0);

        let alice_games = stats.player_history("ALICE", 10).unwrap();
        assert_eq!(alice_games.len(), 2);
        assert_eq!(alice_games[0].result, MatchResult::Loss);
    }
}
