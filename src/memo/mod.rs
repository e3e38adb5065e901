//! Memoization Module
//!
//! Caches computation results in a [`SharedCache`](crate::cache::SharedCache),
//! keyed by computation name and arguments.

mod key;
mod memoized;
mod tagged;

pub use key::{JsonKey, KeyStrategy};
pub use memoized::{Memoized, Memoizer};
