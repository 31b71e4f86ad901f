//! Themed symbol sets.
//!
//! A theme is an immutable named list of distinct glyphs. Cards carry a
//! `SymbolId` (an index into that list), so matching never compares strings.
//!
//! Four themes ship with the crate, mirroring the browser game: Animals,
//! Fruits, Sweets and Sea, sixteen symbols each.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, SymbolId, MAX_SYMBOLS};
use crate::error::ConfigError;

/// An immutable named collection of distinct symbols.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTheme", into = "RawTheme")]
pub struct ThemeSet {
    key: String,
    name: String,
    symbols: Vec<String>,
}

/// Unvalidated serde form of a theme.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawTheme {
    key: String,
    name: String,
    symbols: Vec<String>,
}

impl TryFrom<RawTheme> for ThemeSet {
    type Error = ConfigError;

    fn try_from(raw: RawTheme) -> Result<Self, Self::Error> {
        ThemeSet::new(raw.key, raw.name, raw.symbols)
    }
}

impl From<ThemeSet> for RawTheme {
    fn from(theme: ThemeSet) -> Self {
        Self {
            key: theme.key,
            name: theme.name,
            symbols: theme.symbols,
        }
    }
}

impl ThemeSet {
    /// Create a theme, rejecting empty symbol lists, duplicate glyphs and
    /// lists too long for a `SymbolId` to address.
    pub fn new<S: Into<String>>(
        key: impl Into<String>,
        name: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Result<Self, ConfigError> {
        let key = key.into();
        let name = name.into();
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();

        if symbols.is_empty() {
            return Err(ConfigError::EmptyTheme { theme: name });
        }
        if symbols.len() > MAX_SYMBOLS {
            return Err(ConfigError::TooManySymbols {
                theme: name,
                count: symbols.len(),
                max: MAX_SYMBOLS,
            });
        }

        let mut seen = FxHashSet::default();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol {
                    theme: name,
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(Self { key, name, symbols })
    }

    /// Short lowercase identifier (`"animals"`).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name (`"Animals"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Never true for a constructed theme.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbol IDs in this theme.
    pub fn symbol_ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).filter_map(SymbolId::from_index)
    }

    /// Glyph for a symbol, or `None` if the ID is not from this theme.
    #[must_use]
    pub fn glyph(&self, symbol: SymbolId) -> Option<&str> {
        self.symbols.get(symbol.index()).map(String::as_str)
    }
}

/// How a round picks its theme.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeChoice {
    /// A theme from the catalog at random every round, drawn only from
    /// themes large enough for the pair count.
    #[default]
    Random,
    /// Always this theme.
    Fixed(ThemeSet),
}

impl ThemeChoice {
    /// Resolve to a concrete theme for a round of `pair_count` pairs.
    ///
    /// The RNG is only drawn from when a theme is actually picked, so a
    /// failed resolve leaves it untouched.
    pub fn resolve(
        &self,
        catalog: &ThemeCatalog,
        pair_count: usize,
        rng: &mut GameRng,
    ) -> Result<ThemeSet, ConfigError> {
        match self {
            ThemeChoice::Fixed(theme) => Ok(theme.clone()),
            ThemeChoice::Random => {
                if let Some(theme) = catalog.random_fitting(pair_count, rng) {
                    return Ok(theme.clone());
                }
                match catalog.largest() {
                    Some(available) => Err(ConfigError::PairCountExceedsTheme {
                        pair_count,
                        available,
                    }),
                    None => Err(ConfigError::UnknownTheme {
                        key: "<random>".to_string(),
                    }),
                }
            }
        }
    }
}

impl From<ThemeSet> for ThemeChoice {
    fn from(theme: ThemeSet) -> Self {
        ThemeChoice::Fixed(theme)
    }
}

/// Registry of named themes, keyed by `ThemeSet::key`.
#[derive(Clone, Debug, Default)]
pub struct ThemeCatalog {
    themes: Vec<ThemeSet>,
    by_key: FxHashMap<String, usize>,
}

impl ThemeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in themes: animals, fruits, sweets, sea.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (key, name, symbols) in BUILTIN_THEMES {
            // Built-in lists are distinct and non-empty
            if let Ok(theme) = ThemeSet::new(*key, *name, symbols.iter().copied()) {
                catalog.register(theme);
            }
        }
        catalog
    }

    /// Add or replace a theme.
    pub fn register(&mut self, theme: ThemeSet) {
        if let Some(&idx) = self.by_key.get(theme.key()) {
            self.themes[idx] = theme;
        } else {
            self.by_key.insert(theme.key().to_string(), self.themes.len());
            self.themes.push(theme);
        }
    }

    /// Look up a theme by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ThemeSet> {
        self.by_key.get(key).map(|&idx| &self.themes[idx])
    }

    /// Look up a theme by key, as a configuration error if missing.
    pub fn require(&self, key: &str) -> Result<&ThemeSet, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::UnknownTheme { key: key.to_string() })
    }

    /// Pick uniformly among themes with at least `pair_count` symbols.
    ///
    /// Returns `None` without touching the RNG when no theme fits.
    #[must_use]
    pub fn random_fitting(&self, pair_count: usize, rng: &mut GameRng) -> Option<&ThemeSet> {
        let fitting: Vec<&ThemeSet> = self.themes.iter().filter(|t| t.len() >= pair_count).collect();
        if fitting.is_empty() {
            return None;
        }
        rng.choose(&fitting).copied()
    }

    /// Symbol count of the largest theme.
    #[must_use]
    pub fn largest(&self) -> Option<usize> {
        self.themes.iter().map(ThemeSet::len).max()
    }

    /// Registered theme keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(ThemeSet::key)
    }

    /// Number of registered themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Is the catalog empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

type BuiltinTheme = (&'static str, &'static str, &'static [&'static str]);

const BUILTIN_THEMES: &[BuiltinTheme] = &[
    (
        "animals",
        "Animals",
        &[
            "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🦁", "🐵", "🐸", "🐙", "🦄", "🐝", "🦉", "🐯",
        ],
    ),
    (
        "fruits",
        "Fruits",
        &[
            "🍎", "🍌", "🍇", "🍉", "🍓", "🍒", "🍑", "🍍", "🥭", "🍐", "🥝", "🍋", "🍊", "🍈", "🍏", "🍅",
        ],
    ),
    (
        "sweets",
        "Sweets",
        &[
            "🍰", "🍩", "🍪", "🧁", "🍫", "🍬", "🍭", "🥧", "🍮", "🍯", "🍨", "🍧", "🍡", "🍦", "🧋", "🥠",
        ],
    ),
    (
        "sea",
        "Sea",
        &[
            "🐬", "🐟", "🐠", "🦀", "🦞", "🦑", "🐚", "🦐", "🐳", "🐋", "🐙", "🦈", "🪸", "🪼", "🌊", "🛥️",
        ],
    ),
];
