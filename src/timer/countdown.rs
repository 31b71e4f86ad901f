//! Round countdown.
//!
//! The timer owns only its counters. Each tick is a scheduler task tagged
//! with the timer's generation; `start`, `stop` and `restart` move to a new
//! generation, so a tick scheduled before any of them is ignored when it
//! finally fires.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

/// Interval between ticks.
pub const TICK_MS: u64 = 1000;

/// Something the countdown reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// One second elapsed; `remaining` seconds left.
    Tick(u32),
    /// The countdown reached zero. Fires once per start.
    Expired,
}

/// Events produced by a single tick. Never more than a tick and an expiry.
pub type TickEvents = SmallVec<[TimerEvent; 2]>;

/// What `start` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerStart {
    /// Counting down. Schedule the first tick under `generation`.
    Running { generation: u64 },
    /// Started at zero: expired on the spot with no ticks.
    Expired,
}

/// One-tick-per-second countdown.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundTimer {
    remaining: u32,
    generation: u64,
    running: bool,
}

impl RoundTimer {
    /// Create a stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Is a countdown active?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation of the live countdown. Ticks from any other are stale.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin counting down from `duration_secs`, replacing any countdown
    /// already in progress.
    pub fn start(&mut self, duration_secs: u32) -> TimerStart {
        self.stop();
        self.remaining = duration_secs;
        if duration_secs == 0 {
            return TimerStart::Expired;
        }
        self.running = true;
        trace!(duration_secs, generation = self.generation, "countdown started");
        TimerStart::Running {
            generation: self.generation,
        }
    }

    /// Halt the countdown. Idempotent.
    pub fn stop(&mut self) {
        // New generation invalidates any tick already scheduled
        self.generation = self.generation.wrapping_add(1);
        self.running = false;
    }

    /// `stop` followed by `start`.
    pub fn restart(&mut self, duration_secs: u32) -> TimerStart {
        self.stop();
        self.start(duration_secs)
    }

    /// Handle a tick scheduled under `generation`.
    ///
    /// Stale or post-stop ticks return no events. Otherwise one `Tick`, plus
    /// `Expired` when the count reaches zero, after which the timer is
    /// stopped and the caller must not schedule another tick.
    pub fn on_tick(&mut self, generation: u64) -> TickEvents {
        if !self.running || generation != self.generation {
            trace!(generation, live = self.generation, "stale tick dropped");
            return SmallVec::new();
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            smallvec![TimerEvent::Tick(0), TimerEvent::Expired]
        } else {
            smallvec![TimerEvent::Tick(self.remaining)]
        }
    }
}
