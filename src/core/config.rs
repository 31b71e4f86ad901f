//! Round configuration.
//!
//! A `RoundConfig` says how many pairs to deal, from which theme, how long
//! the clock runs, and how long a mismatched pair stays face up.
//!
//! ```
//! use memory_match::core::RoundConfig;
//! use memory_match::board::ThemeSet;
//!
//! let theme = ThemeSet::new("ab", "AB", ["A", "B"]).unwrap();
//! let config = RoundConfig::new(theme).with_pairs(2).with_duration_secs(30);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{check_pair_count, ThemeChoice};
use crate::core::MAX_PAIRS;
use crate::error::ConfigError;

/// Default pairs per round (16 cards).
pub const DEFAULT_PAIRS: usize = 8;

/// Default round length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Pause before a mismatch is evaluated, in milliseconds.
pub const REVEAL_PAUSE_MS: u64 = 420;

/// Shake animation length for a mismatch, in milliseconds.
pub const MISMATCH_SHAKE_MS: u64 = 700;

/// Default time a mismatched pair stays face up.
pub const DEFAULT_CONCEAL_DELAY_MS: u64 = REVEAL_PAUSE_MS + MISMATCH_SHAKE_MS;

/// Configuration for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Distinct symbols to deal; the board holds twice as many cards.
    pub pair_count: usize,

    /// Theme source.
    #[serde(default)]
    pub theme: ThemeChoice,

    /// Countdown length.
    pub round_duration_secs: u32,

    /// How long a mismatched pair stays face up before turning back.
    #[serde(default = "default_conceal_delay")]
    pub conceal_delay_ms: u64,
}

fn default_conceal_delay() -> u64 {
    DEFAULT_CONCEAL_DELAY_MS
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIRS,
            theme: ThemeChoice::Random,
            round_duration_secs: DEFAULT_DURATION_SECS,
            conceal_delay_ms: DEFAULT_CONCEAL_DELAY_MS,
        }
    }
}

impl RoundConfig {
    /// Default configuration with the given theme.
    pub fn new(theme: impl Into<ThemeChoice>) -> Self {
        Self {
            theme: theme.into(),
            ..Self::default()
        }
    }

    /// Set the pair count.
    #[must_use]
    pub fn with_pairs(mut self, pair_count: usize) -> Self {
        self.pair_count = pair_count;
        self
    }

    /// Set the round length.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.round_duration_secs = secs;
        self
    }

    /// Set the mismatch concealment delay.
    #[must_use]
    pub fn with_conceal_delay_ms(mut self, ms: u64) -> Self {
        self.conceal_delay_ms = ms;
        self
    }

    /// Number of cards this config deals.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    /// Check everything that can be checked before a theme is chosen.
    ///
    /// Random-theme configs are checked against the catalog when the theme
    /// is drawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if self.round_duration_secs == 0 {
            return Err(ConfigError::NoTime);
        }
        if self.pair_count > MAX_PAIRS {
            return Err(ConfigError::BoardTooLarge {
                pair_count: self.pair_count,
                max: MAX_PAIRS,
            });
        }
        if let ThemeChoice::Fixed(theme) = &self.theme {
            check_pair_count(theme, self.pair_count)?;
        }
        Ok(())
    }
}
