//! Error types.
//!
//! Only configuration and preference I/O can fail. Erratic player input
//! (clicking a matched card, clicking during resolution) is never an error;
//! the resolver ignores it.

use thiserror::Error;

/// Invalid round or theme configuration. Fatal to `start_round`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pair count must be at least 1")]
    NoPairs,
    #[error("pair count ({pair_count}) exceeds the {available} symbols in the theme")]
    PairCountExceedsTheme { pair_count: usize, available: usize },
    #[error("pair count ({pair_count}) exceeds the {max} pairs a board can hold")]
    BoardTooLarge { pair_count: usize, max: usize },
    #[error("round duration must be at least 1 second")]
    NoTime,
    #[error("theme {theme:?} has no symbols")]
    EmptyTheme { theme: String },
    #[error("theme {theme:?} lists symbol {symbol:?} more than once")]
    DuplicateSymbol { theme: String, symbol: String },
    #[error("theme {theme:?} has {count} symbols, more than the {max} a board can address")]
    TooManySymbols { theme: String, count: usize, max: usize },
    #[error("no built-in theme named {key:?}")]
    UnknownTheme { key: String },
}

/// Failure reading or writing the persisted preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any error the game core can report.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Preference(#[from] PreferenceError),
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::PairCountExceedsTheme {
            pair_count: 9,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "pair count (9) exceeds the 4 symbols in the theme"
        );
        assert_eq!(ConfigError::NoPairs.to_string(), "pair count must be at least 1");
    }

    #[test]
    fn test_game_error_is_transparent() {
        let err: GameError = ConfigError::NoTime.into();
        assert_eq!(err.to_string(), "round duration must be at least 1 second");
        assert!(matches!(err, GameError::Config(ConfigError::NoTime)));
    }
}
