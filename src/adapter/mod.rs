//! Core-to-presentation boundary.
//!
//! The round core reports state changes as `RoundEvent`s pushed into a
//! `RoundObserver`. Rendering, sound and decoration live entirely on the
//! observer side; nothing here depends on a display or audio backend.
//!
//! ## Example
//!
//! ```
//! use memory_match::adapter::{EventLog, RoundEvent, RoundObserver};
//!
//! let mut log = EventLog::new();
//! log.on_event(&RoundEvent::ScoreChanged(10));
//! assert_eq!(log.events(), &[RoundEvent::ScoreChanged(10)]);
//! ```

mod event;
mod observer;

pub use event::RoundEvent;
pub use observer::{EventLog, RoundObserver, TracingObserver};

/// Render seconds as `MM:SS`, the format of the round clock.
///
/// ```
/// assert_eq!(memory_match::adapter::format_clock(75), "01:15");
/// ```
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(6000), "100:00");
    }
}
