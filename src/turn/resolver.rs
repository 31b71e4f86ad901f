//! Turn resolution state machine.
//!
//! ```text
//!            select            select (match)
//!   Empty ───────────► OneSelected ──────────────► Empty
//!     ▲                     │
//!     │ conceal             │ select (mismatch)
//!     └──── Resolving ◄─────┘
//! ```
//!
//! While `Resolving`, every selection is dropped. That lock is what keeps a
//! third card out of an unresolved turn.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::adapter::RoundEvent;
use crate::core::{Card, CardId, RoundState};

/// Selection state of the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// No card face up this turn.
    #[default]
    Empty,
    /// One card face up, waiting for its partner.
    OneSelected(CardId),
    /// A mismatched pair is face up, waiting to be concealed. Input is locked.
    Resolving { first: CardId, second: CardId },
}

/// Why a selection was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A mismatched pair is still face up.
    Resolving,
    /// The card is already paired.
    AlreadyMatched,
    /// The card is the one already selected this turn.
    AlreadySelected,
    /// No card with that ID on the board.
    UnknownCard,
    /// The round has ended.
    RoundOver,
}

/// Result of a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// First card of the turn turned up.
    Revealed(CardId),
    /// Second card matched the first. `round_won` is set on the last pair.
    Matched {
        first: CardId,
        second: CardId,
        round_won: bool,
    },
    /// Second card did not match. Both stay up until `conceal`.
    Mismatched { first: CardId, second: CardId },
}

impl SelectOutcome {
    /// Did the selection change any state?
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored(_))
    }
}

/// Tracks the cards selected in the current turn and resolves pairs.
///
/// Holds only card IDs. The board and round counters are borrowed from the
/// controller on every call.
#[derive(Clone, Debug, Default)]
pub struct TurnResolver {
    state: TurnState,
}

impl TurnResolver {
    /// Create a resolver with an empty turn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection state.
    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Is input locked until a mismatch is concealed?
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        matches!(self.state, TurnState::Resolving { .. })
    }

    /// Drop the current turn without touching any card.
    pub fn reset(&mut self) {
        self.state = TurnState::Empty;
    }

    /// Select a card.
    ///
    /// Events are appended to `events` in the order they happen.
    pub fn select(
        &mut self,
        id: CardId,
        cards: &mut [Card],
        round: &mut RoundState,
        events: &mut Vec<RoundEvent>,
    ) -> SelectOutcome {
        if let Some(reason) = self.reject_reason(id, cards, round) {
            trace!(card = %id, ?reason, "selection ignored");
            return SelectOutcome::Ignored(reason);
        }

        let card = &mut cards[id.index()];
        card.revealed = true;
        events.push(RoundEvent::CardRevealed(*card));

        match self.state {
            TurnState::Empty => {
                self.state = TurnState::OneSelected(id);
                SelectOutcome::Revealed(id)
            }
            TurnState::OneSelected(first) => {
                self.state = TurnState::Resolving { first, second: id };
                self.resolve_pair(first, id, cards, round, events)
            }
            // Rejected above
            TurnState::Resolving { .. } => SelectOutcome::Ignored(IgnoreReason::Resolving),
        }
    }

    fn reject_reason(&self, id: CardId, cards: &[Card], round: &RoundState) -> Option<IgnoreReason> {
        if !round.is_playing() {
            return Some(IgnoreReason::RoundOver);
        }
        if self.is_resolving() {
            return Some(IgnoreReason::Resolving);
        }
        let Some(card) = cards.get(id.index()) else {
            return Some(IgnoreReason::UnknownCard);
        };
        if card.matched {
            return Some(IgnoreReason::AlreadyMatched);
        }
        if self.state == TurnState::OneSelected(id) {
            return Some(IgnoreReason::AlreadySelected);
        }
        None
    }

    fn resolve_pair(
        &mut self,
        first: CardId,
        second: CardId,
        cards: &mut [Card],
        round: &mut RoundState,
        events: &mut Vec<RoundEvent>,
    ) -> SelectOutcome {
        if cards[first.index()].pairs_with(&cards[second.index()]) {
            cards[first.index()].matched = true;
            cards[second.index()].matched = true;
            let round_won = round.record_match();
            debug!(%first, %second, score = round.score, matched = round.matched_pairs, "pair matched");

            events.push(RoundEvent::Matched(cards[first.index()], cards[second.index()]));
            events.push(RoundEvent::ScoreChanged(round.score));
            if round_won {
                events.push(RoundEvent::RoundWon {
                    final_score: round.score,
                });
            }

            self.state = TurnState::Empty;
            SelectOutcome::Matched {
                first,
                second,
                round_won,
            }
        } else {
            let changed = round.record_mismatch();
            debug!(%first, %second, score = round.score, "pair mismatched");

            events.push(RoundEvent::Mismatched(cards[first.index()], cards[second.index()]));
            if changed {
                events.push(RoundEvent::ScoreChanged(round.score));
            }

            SelectOutcome::Mismatched { first, second }
        }
    }

    /// Turn a mismatched pair back face down and unlock input.
    ///
    /// Returns false (and does nothing) unless a mismatch is pending.
    pub fn conceal(&mut self, cards: &mut [Card], events: &mut Vec<RoundEvent>) -> bool {
        let TurnState::Resolving { first, second } = self.state else {
            return false;
        };

        for id in [first, second] {
            if let Some(card) = cards.get_mut(id.index()) {
                if !card.matched {
                    card.revealed = false;
                }
            }
        }
        self.state = TurnState::Empty;

        if let (Some(a), Some(b)) = (cards.get(first.index()), cards.get(second.index())) {
            events.push(RoundEvent::CardsConcealed(*a, *b));
        }
        debug!(%first, %second, "mismatched pair concealed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SymbolId;

    /// Board laid out as A A B B.
    fn board() -> Vec<Card> {
        [0, 0, 1, 1]
            .iter()
            .enumerate()
            .map(|(i, &s)| Card::new(CardId::new(i as u16), SymbolId::new(s)))
            .collect()
    }

    fn id(i: u16) -> CardId {
        CardId::new(i)
    }

    #[test]
    fn test_first_selection_reveals() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        let outcome = resolver.select(id(2), &mut cards, &mut round, &mut events);

        assert_eq!(outcome, SelectOutcome::Revealed(id(2)));
        assert_eq!(resolver.state(), TurnState::OneSelected(id(2)));
        assert!(cards[2].revealed);
        assert_eq!(events, vec![RoundEvent::CardRevealed(cards[2])]);
    }

    #[test]
    fn test_match() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        resolver.select(id(0), &mut cards, &mut round, &mut events);
        let outcome = resolver.select(id(1), &mut cards, &mut round, &mut events);

        assert_eq!(
            outcome,
            SelectOutcome::Matched {
                first: id(0),
                second: id(1),
                round_won: false,
            }
        );
        assert_eq!(resolver.state(), TurnState::Empty);
        assert!(cards[0].matched && cards[1].matched);
        assert_eq!(round.score, 10);
        assert_eq!(round.matched_pairs, 1);
        assert_eq!(
            events.iter().filter(|e| matches!(e, RoundEvent::Matched(..))).count(),
            1
        );
        assert_eq!(events.last(), Some(&RoundEvent::ScoreChanged(10)));
    }

    #[test]
    fn test_mismatch_locks_until_concealed() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        round.score = 5;
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        resolver.select(id(0), &mut cards, &mut round, &mut events);
        let outcome = resolver.select(id(2), &mut cards, &mut round, &mut events);

        assert_eq!(
            outcome,
            SelectOutcome::Mismatched {
                first: id(0),
                second: id(2),
            }
        );
        assert!(resolver.is_resolving());
        assert_eq!(round.score, 4);
        assert!(cards[0].revealed && cards[2].revealed);

        // Third card is rejected, not queued
        let before_cards = cards.clone();
        let before_round = round.clone();
        let before_events = events.len();
        assert_eq!(
            resolver.select(id(3), &mut cards, &mut round, &mut events),
            SelectOutcome::Ignored(IgnoreReason::Resolving)
        );
        assert_eq!(cards, before_cards);
        assert_eq!(round, before_round);
        assert_eq!(events.len(), before_events);

        assert!(resolver.conceal(&mut cards, &mut events));
        assert_eq!(resolver.state(), TurnState::Empty);
        assert!(!cards[0].revealed && !cards[2].revealed);
        assert!(matches!(events.last(), Some(RoundEvent::CardsConcealed(..))));
    }

    #[test]
    fn test_mismatch_at_zero_score_emits_no_score_change() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        resolver.select(id(1), &mut cards, &mut round, &mut events);
        resolver.select(id(3), &mut cards, &mut round, &mut events);

        assert_eq!(round.score, 0);
        assert!(!events.iter().any(|e| matches!(e, RoundEvent::ScoreChanged(_))));
        assert_eq!(
            events.iter().filter(|e| matches!(e, RoundEvent::Mismatched(..))).count(),
            1
        );
    }

    #[test]
    fn test_reselecting_same_card_is_ignored() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        resolver.select(id(0), &mut cards, &mut round, &mut events);
        assert_eq!(
            resolver.select(id(0), &mut cards, &mut round, &mut events),
            SelectOutcome::Ignored(IgnoreReason::AlreadySelected)
        );
        assert_eq!(resolver.state(), TurnState::OneSelected(id(0)));
        assert_eq!(round.matched_pairs, 0);
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        resolver.select(id(0), &mut cards, &mut round, &mut events);
        resolver.select(id(1), &mut cards, &mut round, &mut events);
        assert_eq!(
            resolver.select(id(1), &mut cards, &mut round, &mut events),
            SelectOutcome::Ignored(IgnoreReason::AlreadyMatched)
        );
        assert_eq!(resolver.state(), TurnState::Empty);
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        assert_eq!(
            resolver.select(id(99), &mut cards, &mut round, &mut events),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_round_won_once() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        for i in [0, 1, 2, 3] {
            resolver.select(id(i), &mut cards, &mut round, &mut events);
        }

        assert_eq!(round.score, 20);
        assert_eq!(round.matched_pairs, 2);
        assert_eq!(
            events.iter().filter(|e| matches!(e, RoundEvent::RoundWon { .. })).count(),
            1
        );
        assert_eq!(events.last(), Some(&RoundEvent::RoundWon { final_score: 20 }));
    }

    #[test]
    fn test_selection_after_round_over() {
        let mut cards = board();
        let mut round = RoundState::new(2, 60);
        round.phase = crate::core::RoundPhase::TimedOut;
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        assert_eq!(
            resolver.select(id(0), &mut cards, &mut round, &mut events),
            SelectOutcome::Ignored(IgnoreReason::RoundOver)
        );
        assert!(!cards[0].revealed);
    }

    #[test]
    fn test_conceal_without_mismatch_is_noop() {
        let mut cards = board();
        let mut events = Vec::new();
        let mut resolver = TurnResolver::new();

        assert!(!resolver.conceal(&mut cards, &mut events));
        assert!(events.is_empty());
    }
}
