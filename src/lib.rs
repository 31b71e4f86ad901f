//! # memory-match
//!
//! The game core of a memory-matching card game: deal a shuffled board of
//! face-down pairs, let the player turn up two cards at a time, score
//! matches, and end the round when every pair is found or the clock runs
//! out.
//!
//! ## Design Principles
//!
//! 1. **Event-driven**: The core never draws or plays sound. Every state
//!    change is pushed to a `RoundObserver`.
//!
//! 2. **Deterministic**: Randomness comes from an injected, seedable
//!    `GameRng`; time comes from the host through `advance`. The same seed
//!    and the same inputs always replay the same round.
//!
//! 3. **Generation-tagged scheduling**: Timer ticks and mismatch delays are
//!    scheduler tasks tagged with a generation, so a task from a stopped
//!    timer or an abandoned round can never touch the current one.
//!
//! ## Modules
//!
//! - `core`: Cards, round state, configuration, RNG
//! - `board`: Themes and board generation
//! - `turn`: Turn resolution state machine
//! - `timer`: Countdown and logical-clock scheduler
//! - `round`: Round controller
//! - `adapter`: Events and observers
//! - `prefs`: Persisted mute preference

pub mod adapter;
pub mod board;
pub mod core;
pub mod error;
pub mod prefs;
pub mod round;
pub mod timer;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, GameRng, GameRngState, RoundConfig, RoundPhase, RoundState, SymbolId,
};

pub use crate::board::{generate_board, ThemeCatalog, ThemeChoice, ThemeSet};

pub use crate::turn::{IgnoreReason, SelectOutcome, TurnResolver, TurnState};

pub use crate::timer::{RoundTimer, Scheduler, TimerEvent};

pub use crate::round::{ControllerPhase, RoundController, RoundSnapshot};

pub use crate::adapter::{format_clock, EventLog, RoundEvent, RoundObserver, TracingObserver};

pub use crate::prefs::{JsonFilePreferences, MemoryPreferences, PreferenceStore};

pub use crate::error::{ConfigError, GameError, PreferenceError, Result};
