//! State of a single hangman match.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

/// Maximum number of wrong guesses before the game is lost.
pub const MAX_ATTEMPTS: u32 = 6;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Won,
    Lost,
}

/// One match: the secret word, the guesser, and every letter tried so far.
///
/// The session only mutates through [`GameSession::guess_letter`] and
/// [`GameSession::finish`]; everything else is a read.
#[derive(Debug, Clone)]
pub struct GameSession {
    word: String,
    player_name: String,
    guessed: BTreeSet<char>,
    wrong_attempts: u32,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new(word: &str, player_name: &str) -> Self {
        Self {
            word: word.trim().to_uppercase(),
            player_name: player_name.trim().to_string(),
            guessed: BTreeSet::new(),
            wrong_attempts: 0,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn word_len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.wrong_attempts)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn has_tried(&self, letter: char) -> bool {
        self.guessed.contains(&letter.to_ascii_uppercase())
    }

    /// Process one guess. Returns true when the letter occurs in the word.
    ///
    /// A letter that was already tried is a no-op: nothing is recorded and
    /// the wrong-attempt counter does not move.
    pub fn guess_letter(&mut self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        if !self.guessed.insert(letter) {
            return false;
        }
        if !self.word.contains(letter) {
            self.wrong_attempts += 1;
            return false;
        }
        true
    }

    pub fn is_won(&self) -> bool {
        self.word.chars().all(|c| self.guessed.contains(&c))
    }

    pub fn is_lost(&self) -> bool {
        self.wrong_attempts >= MAX_ATTEMPTS
    }

    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_won() {
            SessionStatus::Won
        } else if self.is_lost() {
            SessionStatus::Lost
        } else {
            SessionStatus::InProgress
        }
    }

    /// The word with undiscovered letters replaced by `_`.
    ///
    /// Always exactly as long as the secret word.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { '_' })
            .collect()
    }

    /// Every letter tried so far, sorted.
    pub fn guessed_letters(&self) -> Vec<char> {
        self.guessed.iter().copied().collect()
    }

    /// Letters tried that are not in the word, sorted.
    pub fn wrong_letters(&self) -> Vec<char> {
        self.guessed
            .iter()
            .copied()
            .filter(|&c| !self.word.contains(c))
            .collect()
    }

    /// Stamp the end of the match. Idempotent.
    pub fn finish(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Utc::now());
        }
    }

    /// Match duration so far; fixed once [`GameSession::finish`] ran.
    pub fn duration_seconds(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds().max(0)
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status() {
            SessionStatus::InProgress => "in progress",
            SessionStatus::Won => "won",
            SessionStatus::Lost => "lost",
        };
        write!(
            f,
            "{} | {} | {}/{} wrong | {}",
            self.player_name,
            self.masked_word(),
            self.wrong_attempts,
            MAX_ATTEMPTS,
            status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_progress() {
        let session = GameSession::new("crate", "Alice");
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.word(), "CRATE");
        assert_eq!(session.player_name(), "Alice");
        assert_eq!(session.wrong_attempts(), 0);
        assert_eq!(session.remaining_attempts(), MAX_ATTEMPTS);
        assert!(session.ended_at().is_none());
    }

    #[test]
    fn test_fresh_masked_word_is_all_placeholders() {
        let session = GameSession::new("BANANA", "Alice");
        assert_eq!(session.masked_word(), "______");
        assert_eq!(session.masked_word().chars().count(), session.word_len());
    }

    #[test]
    fn test_masked_word_length_is_stable() {
        let mut session = GameSession::new("BANANA", "Alice");
        session.guess_letter('A');
        session.guess_letter('X');
        assert_eq!(session.masked_word(), "_A_A_A");
        assert_eq!(session.masked_word().chars().count(), session.word_len());
    }

    #[test]
    fn test_guessing_every_letter_wins_with_zero_wrong_attempts() {
        // Any order of correct letters ends in a win without using attempts.
        for order in [['D', 'R', 'O', 'W'], ['W', 'O', 'R', 'D'], ['O', 'W', 'D', 'R']] {
            let mut session = GameSession::new("WORD", "Alice");
            for letter in order {
                session.guess_letter(letter);
            }
            assert_eq!(session.status(), SessionStatus::Won);
            assert_eq!(session.wrong_attempts(), 0);
            assert_eq!(session.remaining_attempts(), MAX_ATTEMPTS);
        }
    }

    #[test]
    fn test_six_distinct_wrong_letters_lose() {
        let mut session = GameSession::new("WORD", "Alice");
        for letter in ['A', 'B', 'C', 'E', 'F', 'G'] {
            assert!(!session.guess_letter(letter));
        }
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(session.wrong_attempts(), MAX_ATTEMPTS);
        assert_eq!(session.remaining_attempts(), 0);
    }

    #[test]
    fn test_repeated_letter_does_not_count_again() {
        let mut session = GameSession::new("WORD", "Alice");
        assert!(!session.guess_letter('X'));
        assert_eq!(session.wrong_attempts(), 1);
        assert!(!session.guess_letter('X'));
        assert_eq!(session.wrong_attempts(), 1);
        assert!(session.has_tried('x'));
    }

    #[test]
    fn test_repeated_correct_letter_is_a_no_op() {
        let mut session = GameSession::new("WORD", "Alice");
        assert!(session.guess_letter('W'));
        assert!(!session.guess_letter('W'));
        assert_eq!(session.wrong_attempts(), 0);
        assert_eq!(session.guessed_letters(), vec!['W']);
    }

    #[test]
    fn test_lowercase_guesses_are_normalized() {
        let mut session = GameSession::new("word", "Alice");
        assert!(session.guess_letter('w'));
        assert_eq!(session.masked_word(), "W___");
    }

    #[test]
    fn test_wrong_letters_are_sorted() {
        let mut session = GameSession::new("WORD", "Alice");
        session.guess_letter('Z');
        session.guess_letter('A');
        session.guess_letter('O');
        assert_eq!(session.wrong_letters(), vec!['A', 'Z']);
        assert_eq!(session.guessed_letters(), vec!['A', 'O', 'Z']);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut session = GameSession::new("WORD", "Alice");
        session.finish();
        let first = session.ended_at();
        session.finish();
        assert_eq!(session.ended_at(), first);
        assert!(session.duration_seconds() >= 0);
    }

    #[test]
    fn test_display_mentions_player_and_mask() {
        let session = GameSession::new("WORD", "Alice");
        let text = session.to_string();
        assert!(text.contains("Alice"));
        assert!(text.contains("____"));
        assert!(text.contains("in progress"));
    }
}
