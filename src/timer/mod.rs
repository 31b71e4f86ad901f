//! Time: the round countdown and the scheduler that drives it.
//!
//! Nothing in this module sleeps or spawns. The host reports elapsed time,
//! the scheduler releases due tasks, and the owner dispatches them.

mod countdown;
mod scheduler;

pub use countdown::{RoundTimer, TickEvents, TimerEvent, TimerStart, TICK_MS};
pub use scheduler::{Scheduled, Scheduler, TaskId};
