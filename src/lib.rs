//! Matching of line-oriented scripting syntaxes.
//!
//! A syntax is described by a pattern such as `give %player% %number% of
//! %item%`. Patterns are compiled once with [pattern::compile_pattern] and
//! then matched against any number of lines with [matcher::match_pattern].
//! Placeholders have no extent of their own, the matcher infers where their
//! text ends from what may follow them and asks a [grammar::Grammar] to
//! confirm the guess.
pub mod config;
pub mod error;
pub mod expr;
pub mod grammar;
pub mod logging;
pub mod matcher;
pub mod pattern;
pub mod types;
mod utils;
