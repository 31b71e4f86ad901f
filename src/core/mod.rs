//! Core types: cards, round state, configuration, RNG.
//!
//! Everything here is plain data. The state machines that mutate it live in
//! `turn`, `timer` and `round`.

pub mod card;
pub mod config;
pub mod rng;
pub mod state;

pub use card::{Card, CardId, SymbolId, MAX_CARDS, MAX_PAIRS, MAX_SYMBOLS};
pub use config::{RoundConfig, DEFAULT_CONCEAL_DELAY_MS, DEFAULT_DURATION_SECS, DEFAULT_PAIRS};
pub use rng::{GameRng, GameRngState};
pub use state::{RoundPhase, RoundState, MATCH_REWARD, MISMATCH_PENALTY};
