//! Pattern resolution and glob matching for gitingester.
//!
//! This crate provides:
//! - [`gitignore`] — `.gitignore` → exclude pattern translation
//! - [`glob`] — the glob dialect the ingestor matches paths with
//! - [`split_patterns`] — `;`-separated CLI lists → [`PatternSet`]

pub mod gitignore;
pub mod glob;

use gitingester_shared::PatternSet;

pub use gitignore::{
    DEFAULT_EXCLUDES, DISABLED_CHARS, GITIGNORE_FILE, default_excludes, resolve_gitignore,
    translate_line,
};
pub use glob::{Glob, PatternMatcher};

/// Separator for pattern lists given on the command line.
pub const LIST_SEPARATOR: char = ';';

/// Split a `;`-separated pattern list into a set.
///
/// Segments are trimmed and empty ones dropped. Returns `None` when nothing
/// is left, so an empty flag behaves like an absent one.
pub fn split_patterns(raw: &str) -> Option<PatternSet> {
    let set: PatternSet = raw
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if set.is_empty() { None } else { Some(set) }
}
