//! Round orchestration.
//!
//! `RoundController` ties the board generator, turn resolver and countdown
//! into a full round: start, play, win or time out, restart.
//!
//! ## Example
//!
//! ```
//! use memory_match::adapter::{EventLog, RoundEvent};
//! use memory_match::board::ThemeSet;
//! use memory_match::core::{GameRng, RoundConfig};
//! use memory_match::round::{ControllerPhase, RoundController};
//!
//! let theme = ThemeSet::new("ab", "AB", ["A", "B"]).unwrap();
//! let config = RoundConfig::new(theme).with_pairs(2).with_duration_secs(3);
//!
//! let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(42));
//! controller.start_round(config).unwrap();
//!
//! // Nobody plays; the clock runs out
//! controller.advance(3_000);
//! assert_eq!(controller.phase(), ControllerPhase::Ended);
//! assert_eq!(
//!     controller.observer().last(),
//!     Some(&RoundEvent::RoundTimedOut { final_score: 0 })
//! );
//! ```

mod controller;

pub use controller::{ControllerPhase, RoundController, RoundSnapshot};
