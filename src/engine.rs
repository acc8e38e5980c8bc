//! Orchestrates game sessions and the persistence that follows them.

use std::sync::Arc;

use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{info, warn};

use crate::session::GameSession;
use crate::store::models::HistoryRecord;
use crate::store::{HistoryStore, PlayerStore, WordStore};

/// Built-in words used when the word store has nothing to offer.
const FALLBACK_WORDS: &[&str] = &[
    "RUST", "PROGRAM", "COMPUTER", "DEVELOPER", "ALGORITHM", "ARCHITECTURE", "ENGINEERING",
    "SOFTWARE",
];

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("illegal state: {0}")]
    IllegalState(String),
}

/// What one guess submission did.
///
/// `valid` is false for input that is not a single letter and for letters
/// that were already tried; neither case consumes an attempt.
#[derive(Debug, Clone)]
pub struct GuessReport {
    pub valid: bool,
    pub correct: bool,
    pub message: String,
    pub session: GameSession,
    pub game_over: bool,
    pub won: bool,
}

impl GuessReport {
    fn rejected(message: String, session: &GameSession) -> Self {
        Self {
            valid: false,
            correct: false,
            message,
            session: session.clone(),
            game_over: false,
            won: false,
        }
    }
}

/// Drives at most one match at a time.
///
/// On termination the engine derives a [`HistoryRecord`] and hands both
/// writes to the tokio blocking pool as a detached task; callers never wait
/// on them and never see their failures. Outside a runtime (plain unit
/// tests) the writes run inline instead, so stored state can be asserted
/// deterministically.
pub struct GameEngine {
    words: Arc<dyn WordStore>,
    players: Arc<dyn PlayerStore>,
    history: Arc<dyn HistoryStore>,
    current: Option<GameSession>,
}

impl GameEngine {
    pub fn new(
        words: Arc<dyn WordStore>,
        players: Arc<dyn PlayerStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            words,
            players,
            history,
            current: None,
        }
    }

    /// Start a game against a randomly drawn word.
    pub fn start_single_player(&mut self, player_name: &str) -> Result<&GameSession, GameError> {
        if player_name.trim().is_empty() {
            return Err(GameError::InvalidInput(
                "player name must not be empty".into(),
            ));
        }
        let word = self.pick_word();
        info!(player = player_name.trim(), "starting single player game");
        Ok(self.current.insert(GameSession::new(&word, player_name)))
    }

    /// Start a game where `chooser` supplied the word and `guesser` plays.
    pub fn start_multiplayer(
        &mut self,
        chooser_name: &str,
        guesser_name: &str,
        word: &str,
    ) -> Result<&GameSession, GameError> {
        if chooser_name.trim().is_empty() {
            return Err(GameError::InvalidInput(
                "chooser name must not be empty".into(),
            ));
        }
        if guesser_name.trim().is_empty() {
            return Err(GameError::InvalidInput(
                "guesser name must not be empty".into(),
            ));
        }
        let word = word.trim();
        if word.chars().count() < 3 {
            return Err(GameError::InvalidInput(
                "the word must be at least 3 letters long".into(),
            ));
        }
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GameError::InvalidInput(
                "the word must contain only letters".into(),
            ));
        }
        info!(
            chooser = chooser_name.trim(),
            guesser = guesser_name.trim(),
            "starting multiplayer game"
        );
        Ok(self.current.insert(GameSession::new(word, guesser_name)))
    }

    /// Submit one guess against the active session.
    pub fn submit_guess(&mut self, input: &str) -> Result<GuessReport, GameError> {
        let session = self
            .current
            .as_mut()
            .ok_or_else(|| GameError::IllegalState("no game in progress".into()))?;
        if session.is_over() {
            return Err(GameError::IllegalState(
                "the game has already finished".into(),
            ));
        }

        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => {
                return Ok(GuessReport::rejected(
                    "enter a single letter".into(),
                    session,
                ));
            }
        };

        if session.has_tried(letter) {
            return Ok(GuessReport::rejected(
                format!("letter {letter} was already tried"),
                session,
            ));
        }

        let correct = session.guess_letter(letter);
        let game_over = session.is_over();
        let won = session.is_won();
        if game_over {
            session.finish();
        }
        let snapshot = session.clone();

        if game_over {
            let record = HistoryRecord::from_session(&snapshot);
            info!(
                player = snapshot.player_name(),
                word = snapshot.word(),
                won,
                "game finished"
            );
            self.persist_result(record, snapshot.player_name().to_string(), won);
        }

        let message = if correct {
            format!("letter {letter} is in the word")
        } else {
            format!("letter {letter} is not in the word")
        };
        Ok(GuessReport {
            valid: true,
            correct,
            message,
            session: snapshot,
            game_over,
            won,
        })
    }

    pub fn current_session(&self) -> Option<&GameSession> {
        self.current.as_ref()
    }

    /// Abandon the active session, if any.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Fire-and-forget persistence of a finished game. Failures are logged
    /// and never reach the player; the reported outcome stands regardless.
    fn persist_result(&self, record: HistoryRecord, player: String, won: bool) {
        let history = Arc::clone(&self.history);
        let players = Arc::clone(&self.players);
        let work = move || {
            if let Err(err) = history.append(&record) {
                warn!(%err, "failed to append history record");
            }
            if let Err(err) = players.record_result(&player, won) {
                warn!(%err, "failed to update player record");
            }
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(work);
            }
            Err(_) => work(),
        }
    }

    fn pick_word(&self) -> String {
        let words = self.words.list_all().unwrap_or_else(|err| {
            warn!(%err, "failed to read word list");
            Vec::new()
        });
        let mut rng = rand::thread_rng();
        if let Some(word) = words.choose(&mut rng) {
            return word.clone();
        }
        warn!("word list is empty, using built-in fallback");
        FALLBACK_WORDS
            .choose(&mut rng)
            .copied()
            .unwrap_or("RUST")
            .to_string()
    }
}
