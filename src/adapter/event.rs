//! Round events.
//!
//! Every observable change in a round is reported as a `RoundEvent`. The
//! core pushes them; it never expects anything back.

use serde::{Deserialize, Serialize};

use crate::core::Card;

/// Something that happened during a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A new board was dealt, all cards face down.
    BoardReady { cards: Vec<Card> },
    /// A card was turned face up.
    CardRevealed(Card),
    /// Two cards with the same symbol were found.
    Matched(Card, Card),
    /// Two cards with different symbols were turned up.
    Mismatched(Card, Card),
    /// A mismatched pair was turned back face down.
    CardsConcealed(Card, Card),
    /// The score changed (or was reset at round start).
    ScoreChanged(u32),
    /// The last pair was found.
    RoundWon { final_score: u32 },
    /// The clock ran out.
    RoundTimedOut { final_score: u32 },
    /// One second elapsed.
    Tick { remaining: u32 },
    /// The countdown (re)started at `seconds`.
    TimerStarted { seconds: u32 },
    /// The mute preference changed.
    MuteChanged(bool),
}

impl RoundEvent {
    /// Does this event end the round?
    #[must_use]
    pub fn is_round_end(&self) -> bool {
        matches!(self, RoundEvent::RoundWon { .. } | RoundEvent::RoundTimedOut { .. })
    }

    /// Stable short name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RoundEvent::BoardReady { .. } => "board_ready",
            RoundEvent::CardRevealed(_) => "card_revealed",
            RoundEvent::Matched(..) => "match",
            RoundEvent::Mismatched(..) => "mismatch",
            RoundEvent::CardsConcealed(..) => "cards_concealed",
            RoundEvent::ScoreChanged(_) => "score_changed",
            RoundEvent::RoundWon { .. } => "round_won",
            RoundEvent::RoundTimedOut { .. } => "round_timed_out",
            RoundEvent::Tick { .. } => "tick",
            RoundEvent::TimerStarted { .. } => "timer_started",
            RoundEvent::MuteChanged(_) => "mute_changed",
        }
    }
}
