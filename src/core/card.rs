//! Card identity and per-card runtime state.
//!
//! A board is a flat sequence of cards. A card's `CardId` is its position in
//! that sequence; its `SymbolId` is the equality key used for matching.

use serde::{Deserialize, Serialize};

/// Most cards one board can address with a `CardId`.
pub const MAX_CARDS: usize = u16::MAX as usize + 1;

/// Most pairs one board can hold.
pub const MAX_PAIRS: usize = MAX_CARDS / 2;

/// Most symbols one theme can address with a `SymbolId`.
pub const MAX_SYMBOLS: usize = u16::MAX as usize + 1;

/// Position of a card on the board. Stable for the lifetime of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Card ID for a board index, or `None` past `MAX_CARDS`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    /// Board index of this card.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Index of a symbol within its theme.
///
/// Two cards match when their symbol IDs are equal. The theme maps an ID
/// back to the glyph shown on the card face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Symbol ID for a theme index, or `None` past `MAX_SYMBOLS`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(Self)
    }

    /// Index into the theme's symbol list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// A card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Position on the board.
    pub id: CardId,

    /// Matching key.
    pub symbol: SymbolId,

    /// Face up (selected this turn, or matched).
    pub revealed: bool,

    /// Paired with its twin; stays face up for the rest of the round.
    pub matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub const fn new(id: CardId, symbol: SymbolId) -> Self {
        Self {
            id,
            symbol,
            revealed: false,
            matched: false,
        }
    }

    /// Can this card still be picked by the player?
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        !self.matched
    }

    /// Do these two cards carry the same symbol?
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.symbol == other.symbol
    }
}
