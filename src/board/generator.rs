//! Board generation.
//!
//! Picks `pair_count` distinct symbols from a theme, lays each down twice,
//! and shuffles the result. Card IDs are assigned from final positions, so
//! `cards[i].id == CardId(i)` always holds.

use crate::core::{Card, CardId, GameRng, SymbolId, MAX_PAIRS};
use crate::error::ConfigError;

use super::theme::ThemeSet;

/// Deal a fresh shuffled board.
///
/// Fails without dealing anything when `pair_count` is zero or larger than
/// the theme.
pub fn generate_board(
    theme: &ThemeSet,
    pair_count: usize,
    rng: &mut GameRng,
) -> Result<Vec<Card>, ConfigError> {
    check_pair_count(theme, pair_count)?;

    let chosen = rng
        .sample_indices(theme.len(), pair_count)
        .ok_or(ConfigError::PairCountExceedsTheme {
            pair_count,
            available: theme.len(),
        })?;

    // Both conversions are bounded by check_pair_count and ThemeSet::new
    let too_large = ConfigError::BoardTooLarge {
        pair_count,
        max: MAX_PAIRS,
    };
    let mut symbols: Vec<SymbolId> = Vec::with_capacity(pair_count * 2);
    for index in chosen {
        symbols.push(SymbolId::from_index(index).ok_or_else(|| too_large.clone())?);
    }
    symbols.extend_from_within(..);
    rng.shuffle(&mut symbols);

    symbols
        .into_iter()
        .enumerate()
        .map(|(pos, symbol)| {
            CardId::from_index(pos)
                .map(|id| Card::new(id, symbol))
                .ok_or_else(|| too_large.clone())
        })
        .collect()
}

/// Validate a pair count against a theme without dealing.
pub fn check_pair_count(theme: &ThemeSet, pair_count: usize) -> Result<(), ConfigError> {
    if pair_count == 0 {
        return Err(ConfigError::NoPairs);
    }
    if pair_count > MAX_PAIRS {
        return Err(ConfigError::BoardTooLarge {
            pair_count,
            max: MAX_PAIRS,
        });
    }
    if pair_count > theme.len() {
        return Err(ConfigError::PairCountExceedsTheme {
            pair_count,
            available: theme.len(),
        });
    }
    Ok(())
}
