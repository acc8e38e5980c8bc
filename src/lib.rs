//! Hangman game engine with persisted player scores and match history.
//!
//! The crate is split into the session state machine ([`session`]), the
//! orchestrating engine ([`engine`]), read-side statistics ([`stats`]) and
//! the storage contracts with their file-backed implementations ([`store`]).

pub mod args;
pub mod engine;
pub mod session;
pub mod stats;
pub mod store;
