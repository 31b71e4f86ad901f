//! Round state: score, progress, clock and phase.

use serde::{Deserialize, Serialize};

/// Points awarded for a matched pair.
pub const MATCH_REWARD: u32 = 10;

/// Points lost for a mismatched pair. The score never drops below zero.
pub const MISMATCH_PENALTY: u32 = 1;

/// Coarse lifecycle of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Accepting selections.
    #[default]
    Playing,
    /// Every pair found.
    Won,
    /// Clock ran out first.
    TimedOut,
}

impl RoundPhase {
    /// Won and TimedOut never change again within a round.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::TimedOut)
    }
}

/// Mutable per-round counters.
///
/// Owned by the round controller; the turn resolver and timer only see it
/// through `&mut` borrows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Current score.
    pub score: u32,

    /// Pairs found so far, in `0..=total_pairs`.
    pub matched_pairs: u32,

    /// Pairs dealt this round.
    pub total_pairs: u32,

    /// Seconds left on the clock.
    pub time_remaining: u32,

    /// Lifecycle phase.
    pub phase: RoundPhase,
}

impl RoundState {
    /// Fresh state for a round of `total_pairs` pairs and `duration_secs` seconds.
    #[must_use]
    pub fn new(total_pairs: u32, duration_secs: u32) -> Self {
        Self {
            score: 0,
            matched_pairs: 0,
            total_pairs,
            time_remaining: duration_secs,
            phase: RoundPhase::Playing,
        }
    }

    /// Record a found pair. Returns true if that was the last one.
    pub fn record_match(&mut self) -> bool {
        self.matched_pairs = (self.matched_pairs + 1).min(self.total_pairs);
        self.score = self.score.saturating_add(MATCH_REWARD);
        self.all_matched()
    }

    /// Record a mismatch. Returns true if the score changed.
    pub fn record_mismatch(&mut self) -> bool {
        let before = self.score;
        self.score = self.score.saturating_sub(MISMATCH_PENALTY);
        self.score != before
    }

    /// Have all pairs been found?
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.matched_pairs == self.total_pairs
    }

    /// Still accepting selections?
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }
}
