//! Turn resolution.
//!
//! A turn is at most two face-up cards. The resolver decides match or
//! mismatch, applies the score change, and locks input while a mismatched
//! pair waits to be turned back.

mod resolver;

pub use resolver::{IgnoreReason, SelectOutcome, TurnResolver, TurnState};
