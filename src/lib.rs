//! A crate for reducing combinator expressions by graph rewriting.

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;

/// Tagged atoms: literals (combinator codes, raw data, placeholders)
/// and application-node references.
pub mod atom;
pub use atom::{Atom, Comb};

/// The application-node heap: fixed-capacity pool, free-list,
/// reference-count operations.
pub mod heap;
pub use heap::AppHeap;

/// The spine-unwinding reducer and the combinator rewrite rules.
pub mod reduce;

/// Pretty-printing of application graphs.
pub mod print;

/// Surface-syntax parser (`@`-prefix and parenthesised forms).
pub mod parse;

/// The named macro library (`$y`, `$pair`, `$fact`, ...).
pub mod builtins;

/// JSON import/export of application graphs.
pub mod json;
