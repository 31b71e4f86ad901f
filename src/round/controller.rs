//! Round lifecycle.
//!
//! The controller owns the board, the round counters, the turn resolver,
//! the countdown and the scheduler. Everything that happens to a round goes
//! through one of its methods, and every resulting event is pushed to the
//! observer before the method returns.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::adapter::{RoundEvent, RoundObserver};
use crate::board::{generate_board, ThemeCatalog, ThemeSet};
use crate::core::{Card, CardId, GameRng, GameRngState, RoundConfig, RoundPhase, RoundState};
use crate::error::{ConfigError, PreferenceError};
use crate::prefs::{MemoryPreferences, PreferenceStore};
use crate::timer::{RoundTimer, Scheduled, Scheduler, TimerEvent, TimerStart, TICK_MS};
use crate::turn::{IgnoreReason, SelectOutcome, TurnResolver, TurnState};

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// No round started yet.
    #[default]
    Idle,
    /// A round is accepting selections.
    Playing,
    /// The round was won or timed out; waiting for a restart.
    Ended,
}

/// Work the scheduler hands back to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    /// One countdown second. Generation is the timer's.
    TimerTick,
    /// Turn a mismatched pair back over. Generation is the round's.
    Conceal,
}

/// Read-only copy of the controller, for adapters that poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: ControllerPhase,
    pub round: Option<RoundState>,
    pub cards: Vec<Card>,
    pub theme: Option<String>,
    pub turn: TurnState,
    pub muted: bool,
    pub now_ms: u64,
    pub rng: GameRngState,
}

/// Runs rounds and reports what happens to a `RoundObserver`.
pub struct RoundController<O: RoundObserver> {
    observer: O,
    rng: GameRng,
    catalog: ThemeCatalog,
    prefs: Box<dyn PreferenceStore>,
    muted: bool,

    phase: ControllerPhase,
    config: Option<RoundConfig>,
    theme: Option<ThemeSet>,
    cards: Vec<Card>,
    round: Option<RoundState>,
    resolver: TurnResolver,
    timer: RoundTimer,
    scheduler: Scheduler<Task>,
    round_generation: u64,

    /// Events produced by the current call, not yet delivered.
    pending: Vec<RoundEvent>,
}

impl<O: RoundObserver> RoundController<O> {
    /// Create a controller seeded from OS entropy.
    pub fn new(observer: O) -> Self {
        Self::with_rng(observer, GameRng::from_entropy())
    }

    /// Create a controller with an explicit RNG, for reproducible boards.
    pub fn with_rng(observer: O, rng: GameRng) -> Self {
        Self {
            observer,
            rng,
            catalog: ThemeCatalog::builtin(),
            prefs: Box::new(MemoryPreferences::default()),
            muted: false,
            phase: ControllerPhase::Idle,
            config: None,
            theme: None,
            cards: Vec::new(),
            round: None,
            resolver: TurnResolver::new(),
            timer: RoundTimer::new(),
            scheduler: Scheduler::new(),
            round_generation: 0,
            pending: Vec::new(),
        }
    }

    /// Use `catalog` for random theme choice instead of the built-in themes.
    #[must_use]
    pub fn with_catalog(mut self, catalog: ThemeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Persist the mute flag in `store`, loading its current value.
    ///
    /// An unreadable store is logged and treated as unmuted.
    #[must_use]
    pub fn with_preferences(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.muted = match store.load_muted() {
            Ok(muted) => muted,
            Err(err) => {
                warn!(%err, "failed to load mute preference");
                false
            }
        };
        self.prefs = Box::new(store);
        self
    }

    // === Adapter-to-core calls ===

    /// Deal a new board and start the clock.
    ///
    /// Any round in progress is abandoned. On a configuration error nothing
    /// changes: the previous round (if any) keeps running.
    pub fn start_round(&mut self, config: RoundConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let theme = config.theme.resolve(&self.catalog, config.pair_count, &mut self.rng)?;
        let cards = generate_board(&theme, config.pair_count, &mut self.rng)?;

        // Past this point the round cannot fail
        self.scheduler.clear();
        self.timer.stop();
        self.round_generation = self.round_generation.wrapping_add(1);
        self.resolver.reset();

        let total_pairs = u32::try_from(config.pair_count).unwrap_or(u32::MAX);
        let round = RoundState::new(total_pairs, config.round_duration_secs);
        info!(
            seed = self.rng.seed(),
            theme = theme.key(),
            pairs = total_pairs,
            duration_secs = config.round_duration_secs,
            generation = self.round_generation,
            "round started"
        );

        self.pending.push(RoundEvent::BoardReady { cards: cards.clone() });
        self.pending.push(RoundEvent::ScoreChanged(round.score));

        let duration = config.round_duration_secs;
        self.cards = cards;
        self.round = Some(round);
        self.theme = Some(theme);
        self.config = Some(config);
        self.phase = ControllerPhase::Playing;

        self.start_timer(duration);
        self.flush();
        Ok(())
    }

    /// Start over with the last-used configuration.
    ///
    /// Returns `Ok(false)` if no round was ever started.
    pub fn restart_round(&mut self) -> Result<bool, ConfigError> {
        let Some(config) = self.config.clone() else {
            debug!("restart requested before any round");
            return Ok(false);
        };
        info!(abandoned = self.phase == ControllerPhase::Playing, "restarting round");
        self.start_round(config)?;
        Ok(true)
    }

    /// Start over with a new configuration.
    pub fn restart_round_with(&mut self, config: RoundConfig) -> Result<(), ConfigError> {
        info!(abandoned = self.phase == ControllerPhase::Playing, "restarting round with new config");
        self.start_round(config)
    }

    /// Pick a card. Ignored unless a round is playing.
    pub fn select_card(&mut self, id: CardId) -> SelectOutcome {
        if self.phase != ControllerPhase::Playing {
            trace!(card = %id, phase = ?self.phase, "selection outside a round");
            return SelectOutcome::Ignored(IgnoreReason::RoundOver);
        }
        let Some(round) = self.round.as_mut() else {
            return SelectOutcome::Ignored(IgnoreReason::RoundOver);
        };

        let outcome = self.resolver.select(id, &mut self.cards, round, &mut self.pending);
        match outcome {
            SelectOutcome::Mismatched { .. } => self.schedule_conceal(),
            SelectOutcome::Matched { round_won: true, .. } => self.win(),
            _ => {}
        }
        self.flush();
        outcome
    }

    /// Feed `elapsed_ms` of wall-clock time and run whatever fell due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some(entry) = self.scheduler.pop_due(target) {
            self.dispatch(entry);
            self.flush();
        }
        self.scheduler.settle(target);
    }

    /// Change the round length.
    ///
    /// Applies to the next round, and while playing restarts the countdown
    /// at the new length. Before the first round there is nothing to
    /// update, so the call only validates.
    pub fn set_round_duration(&mut self, secs: u32) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::NoTime);
        }
        if let Some(config) = self.config.as_mut() {
            config.round_duration_secs = secs;
        }
        if self.phase == ControllerPhase::Playing {
            debug!(secs, "countdown restarted with new duration");
            self.scheduler.cancel_where(|entry| entry.task == Task::TimerTick);
            self.start_timer(secs);
            self.flush();
        }
        Ok(())
    }

    /// Set the mute flag and persist it.
    ///
    /// The in-memory flag and the event are updated even when saving fails.
    pub fn set_muted(&mut self, muted: bool) -> Result<(), PreferenceError> {
        self.muted = muted;
        self.pending.push(RoundEvent::MuteChanged(muted));
        self.flush();
        self.prefs.save_muted(muted)
    }

    /// Flip the mute flag. Returns the new value.
    pub fn toggle_muted(&mut self) -> Result<bool, PreferenceError> {
        let muted = !self.muted;
        self.set_muted(muted)?;
        Ok(muted)
    }

    // === Accessors ===

    /// Controller lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// Counters of the current (or last) round.
    #[must_use]
    pub fn round_state(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// The board, in position order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Theme of the current (or last) round.
    #[must_use]
    pub fn theme(&self) -> Option<&ThemeSet> {
        self.theme.as_ref()
    }

    /// Configuration of the current (or last) round.
    #[must_use]
    pub fn config(&self) -> Option<&RoundConfig> {
        self.config.as_ref()
    }

    /// Selection state of the current turn.
    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        self.resolver.state()
    }

    /// Mute flag.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Logical time in milliseconds since the controller was created.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Milliseconds until the next scheduled task, if any.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.scheduler.next_due().map(|due| due.saturating_sub(self.scheduler.now_ms()))
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Serializable copy of the controller state.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            round: self.round.clone(),
            cards: self.cards.clone(),
            theme: self.theme.as_ref().map(|t| t.key().to_string()),
            turn: self.resolver.state(),
            muted: self.muted,
            now_ms: self.scheduler.now_ms(),
            rng: self.rng.state(),
        }
    }

    // === Internals ===

    fn start_timer(&mut self, secs: u32) {
        if let Some(round) = self.round.as_mut() {
            round.time_remaining = secs;
        }
        self.pending.push(RoundEvent::TimerStarted { seconds: secs });
        match self.timer.start(secs) {
            TimerStart::Running { generation } => {
                self.scheduler.schedule(TICK_MS, generation, Task::TimerTick);
            }
            TimerStart::Expired => self.time_out(),
        }
    }

    fn schedule_conceal(&mut self) {
        let delay = self.config.as_ref().map_or(0, |c| c.conceal_delay_ms);
        if delay == 0 {
            self.resolver.conceal(&mut self.cards, &mut self.pending);
        } else {
            self.scheduler.schedule(delay, self.round_generation, Task::Conceal);
        }
    }

    fn dispatch(&mut self, entry: Scheduled<Task>) {
        match entry.task {
            Task::TimerTick => self.on_timer_tick(entry.generation),
            Task::Conceal => {
                if entry.generation != self.round_generation {
                    trace!(generation = entry.generation, "stale conceal dropped");
                    return;
                }
                self.resolver.conceal(&mut self.cards, &mut self.pending);
            }
        }
    }

    fn on_timer_tick(&mut self, generation: u64) {
        if self.phase != ControllerPhase::Playing {
            return;
        }
        for event in self.timer.on_tick(generation) {
            match event {
                TimerEvent::Tick(remaining) => {
                    if let Some(round) = self.round.as_mut() {
                        round.time_remaining = remaining;
                    }
                    trace!(remaining, "tick");
                    self.pending.push(RoundEvent::Tick { remaining });
                }
                TimerEvent::Expired => self.time_out(),
            }
        }
        if self.timer.is_running() {
            self.scheduler.schedule(TICK_MS, self.timer.generation(), Task::TimerTick);
        }
    }

    fn win(&mut self) {
        self.timer.stop();
        self.scheduler.cancel_where(|entry| entry.task == Task::TimerTick);
        self.end_round(RoundPhase::Won);
    }

    fn time_out(&mut self) {
        self.timer.stop();
        self.end_round(RoundPhase::TimedOut);
        if let Some(round) = self.round.as_ref() {
            self.pending.push(RoundEvent::RoundTimedOut {
                final_score: round.score,
            });
        }
    }

    fn end_round(&mut self, outcome: RoundPhase) {
        self.phase = ControllerPhase::Ended;
        if let Some(round) = self.round.as_mut() {
            round.phase = outcome;
            info!(
                outcome = ?outcome,
                score = round.score,
                matched = round.matched_pairs,
                total = round.total_pairs,
                time_remaining = round.time_remaining,
                "round ended"
            );
        }
    }

    fn flush(&mut self) {
        for event in self.pending.drain(..) {
            self.observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::EventLog;
    use crate::core::SymbolId;

    fn ab_config() -> RoundConfig {
        let theme = ThemeSet::new("ab", "AB", ["A", "B"]).unwrap();
        RoundConfig::new(theme).with_pairs(2).with_duration_secs(30)
    }

    fn positions_of(cards: &[Card], symbol: SymbolId) -> Vec<CardId> {
        cards.iter().filter(|c| c.symbol == symbol).map(|c| c.id).collect()
    }

    #[test]
    fn test_idle_until_started() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(1));
        assert_eq!(controller.phase(), ControllerPhase::Idle);
        assert!(controller.select_card(CardId::new(0)).is_ignored());
        assert_eq!(controller.restart_round(), Ok(false));
        assert!(controller.observer().is_empty());
    }

    #[test]
    fn test_start_round_events() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(1));
        controller.start_round(ab_config()).unwrap();

        assert_eq!(controller.phase(), ControllerPhase::Playing);
        assert_eq!(controller.cards().len(), 4);
        let events = controller.observer().events();
        assert!(matches!(events[0], RoundEvent::BoardReady { ref cards } if cards.len() == 4));
        assert_eq!(events[1], RoundEvent::ScoreChanged(0));
        assert_eq!(events[2], RoundEvent::TimerStarted { seconds: 30 });
        assert_eq!(controller.next_deadline_ms(), Some(TICK_MS));
    }

    #[test]
    fn test_invalid_config_keeps_current_round() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(1));
        controller.start_round(ab_config()).unwrap();
        let before = controller.snapshot();

        let err = controller.start_round(ab_config().with_pairs(5)).unwrap_err();
        assert!(matches!(err, ConfigError::PairCountExceedsTheme { .. }));
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_conceal_delay_zero_conceals_immediately() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(3));
        controller.start_round(ab_config().with_conceal_delay_ms(0)).unwrap();

        let a = positions_of(controller.cards(), SymbolId::new(0));
        let b = positions_of(controller.cards(), SymbolId::new(1));
        controller.select_card(a[0]);
        controller.select_card(b[0]);

        assert_eq!(controller.turn_state(), TurnState::Empty);
        assert!(controller.cards().iter().all(|c| !c.revealed));
    }

    #[test]
    fn test_toggle_muted() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(1))
            .with_preferences(MemoryPreferences::new(true));
        assert!(controller.is_muted());
        assert!(!controller.toggle_muted().unwrap());
        assert_eq!(controller.observer().last(), Some(&RoundEvent::MuteChanged(false)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut controller = RoundController::with_rng(EventLog::new(), GameRng::new(1));
        controller.start_round(ab_config()).unwrap();
        controller.advance(2500);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.theme.as_deref(), Some("ab"));
        assert_eq!(snapshot.now_ms, 2500);
        assert_eq!(snapshot.round.as_ref().map(|r| r.time_remaining), Some(28));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: RoundSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
