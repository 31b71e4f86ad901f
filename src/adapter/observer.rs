//! Observer trait and the in-crate observers.

use tracing::{debug, info, trace};

use crate::core::Card;

use super::event::RoundEvent;

/// Receiver for round events.
///
/// Implement either `on_event` (to see every event as a value) or any of
/// the specific hooks. The default `on_event` routes to the hooks, and
/// every hook defaults to doing nothing.
pub trait RoundObserver {
    /// Receive one event. The default routes to the specific hooks below.
    fn on_event(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::BoardReady { cards } => self.on_board_ready(cards),
            RoundEvent::CardRevealed(card) => self.on_card_revealed(card),
            RoundEvent::Matched(a, b) => self.on_match(a, b),
            RoundEvent::Mismatched(a, b) => self.on_mismatch(a, b),
            RoundEvent::CardsConcealed(a, b) => self.on_cards_concealed(a, b),
            RoundEvent::ScoreChanged(score) => self.on_score_changed(*score),
            RoundEvent::RoundWon { final_score } => self.on_round_won(*final_score),
            RoundEvent::RoundTimedOut { final_score } => self.on_round_timed_out(*final_score),
            RoundEvent::Tick { remaining } => self.on_tick(*remaining),
            RoundEvent::TimerStarted { seconds } => self.on_timer_started(*seconds),
            RoundEvent::MuteChanged(muted) => self.on_mute_changed(*muted),
        }
    }

    fn on_board_ready(&mut self, _cards: &[Card]) {}
    fn on_card_revealed(&mut self, _card: &Card) {}
    fn on_match(&mut self, _first: &Card, _second: &Card) {}
    fn on_mismatch(&mut self, _first: &Card, _second: &Card) {}
    fn on_cards_concealed(&mut self, _first: &Card, _second: &Card) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_round_won(&mut self, _final_score: u32) {}
    fn on_round_timed_out(&mut self, _final_score: u32) {}
    fn on_tick(&mut self, _seconds_remaining: u32) {}
    fn on_timer_started(&mut self, _seconds: u32) {}
    fn on_mute_changed(&mut self, _muted: bool) {}
}

/// Discards everything.
impl RoundObserver for () {}

impl<O: RoundObserver + ?Sized> RoundObserver for Box<O> {
    fn on_event(&mut self, event: &RoundEvent) {
        (**self).on_event(event);
    }
}

impl<O: RoundObserver + ?Sized> RoundObserver for &mut O {
    fn on_event(&mut self, event: &RoundEvent) {
        (**self).on_event(event);
    }
}

/// Records every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<RoundEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count events matching a predicate.
    pub fn count(&self, pred: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<&RoundEvent> {
        self.events.last()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Is the log empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl RoundObserver for EventLog {
    fn on_event(&mut self, event: &RoundEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing`.
///
/// Round boundaries log at `info`, turn outcomes at `debug`, everything else
/// at `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RoundObserver for TracingObserver {
    fn on_event(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::BoardReady { cards } => info!(cards = cards.len(), "board ready"),
            RoundEvent::RoundWon { final_score } => info!(final_score, "round won"),
            RoundEvent::RoundTimedOut { final_score } => info!(final_score, "round timed out"),
            RoundEvent::Matched(a, b) => debug!(first = %a.id, second = %b.id, "match"),
            RoundEvent::Mismatched(a, b) => debug!(first = %a.id, second = %b.id, "mismatch"),
            other => trace!(event = other.name(), ?other, "round event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, SymbolId};

    #[derive(Default)]
    struct Hooks {
        scores: Vec<u32>,
        ticks: Vec<u32>,
        won: Option<u32>,
    }

    impl RoundObserver for Hooks {
        fn on_score_changed(&mut self, score: u32) {
            self.scores.push(score);
        }
        fn on_tick(&mut self, seconds_remaining: u32) {
            self.ticks.push(seconds_remaining);
        }
        fn on_round_won(&mut self, final_score: u32) {
            self.won = Some(final_score);
        }
    }

    #[test]
    fn test_default_routing() {
        let mut hooks = Hooks::default();
        let card = Card::new(CardId::new(0), SymbolId::new(0));

        hooks.on_event(&RoundEvent::ScoreChanged(10));
        hooks.on_event(&RoundEvent::Tick { remaining: 4 });
        hooks.on_event(&RoundEvent::CardRevealed(card));
        hooks.on_event(&RoundEvent::RoundWon { final_score: 20 });

        assert_eq!(hooks.scores, vec![10]);
        assert_eq!(hooks.ticks, vec![4]);
        assert_eq!(hooks.won, Some(20));
    }

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::new();
        log.on_event(&RoundEvent::Tick { remaining: 2 });
        log.on_event(&RoundEvent::Tick { remaining: 1 });

        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(&RoundEvent::Tick { remaining: 1 }));
        assert_eq!(log.count(|e| matches!(e, RoundEvent::Tick { .. })), 2);

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_forwarding_impls() {
        let mut log = EventLog::new();
        {
            let mut by_ref: &mut EventLog = &mut log;
            <&mut EventLog as RoundObserver>::on_event(&mut by_ref, &RoundEvent::MuteChanged(true));
        }
        {
            let mut boxed: Box<dyn RoundObserver + '_> = Box::new(&mut log);
            <Box<dyn RoundObserver + '_> as RoundObserver>::on_event(&mut boxed, &RoundEvent::MuteChanged(false));
        }

        assert_eq!(
            log.events(),
            &[RoundEvent::MuteChanged(true), RoundEvent::MuteChanged(false)]
        );
    }
}
