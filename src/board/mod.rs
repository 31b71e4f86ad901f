//! Board construction: themes and dealing.
//!
//! ## Example
//!
//! ```
//! use memory_match::board::{generate_board, ThemeSet};
//! use memory_match::core::GameRng;
//!
//! let theme = ThemeSet::new("ab", "AB", ["A", "B"]).unwrap();
//! let cards = generate_board(&theme, 2, &mut GameRng::new(5)).unwrap();
//! assert_eq!(cards.len(), 4);
//! ```

mod generator;
mod theme;

pub use generator::{check_pair_count, generate_board};
pub use theme::{ThemeCatalog, ThemeChoice, ThemeSet};
