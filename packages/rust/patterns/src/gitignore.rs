//! `.gitignore` → exclude pattern translation.
//!
//! Only a subset of gitignore syntax survives the trip into the ingestion
//! glob dialect. Lines that use characters with a different meaning there
//! are dropped rather than guessed at.

use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, instrument, trace};

use gitingester_shared::{IngesterError, PatternSet, Result, pattern_set};

/// Name of the ignore file looked up in the input directory.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Excludes used when the input directory has no ignore file.
pub const DEFAULT_EXCLUDES: [&str; 2] = ["__pycache__*", "*venv*"];

/// A line containing any of these is skipped entirely. `#` also drops
/// comment lines.
pub const DISABLED_CHARS: &[char] = &['$', '[', ']', '#', ','];

/// The fallback exclude set as an owned [`PatternSet`].
pub fn default_excludes() -> PatternSet {
    pattern_set(DEFAULT_EXCLUDES)
}

/// Resolve the exclude patterns for `dir` from its `.gitignore`.
///
/// Returns [`default_excludes`] when no ignore file exists. An ignore file
/// that is empty, or whose lines are all dropped, yields an empty set.
/// Anything else at that path (a directory, say) fails with an I/O error.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn resolve_gitignore(dir: &Path) -> Result<PatternSet> {
    let path = dir.join(GITIGNORE_FILE);

    if !path.exists() {
        debug!("no .gitignore found, using default excludes");
        return Ok(default_excludes());
    }

    let file = std::fs::File::open(&path).map_err(|e| IngesterError::io(&path, e))?;
    let mut patterns = PatternSet::new();

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| IngesterError::io(&path, e))?;
        if let Some(pattern) = translate_line(&line) {
            patterns.insert(pattern);
        }
    }

    debug!(count = patterns.len(), "resolved .gitignore patterns");
    Ok(patterns)
}

/// Translate one `.gitignore` line into an exclude pattern.
///
/// - blank lines and lines with a [`DISABLED_CHARS`] member yield `None`
/// - leading and trailing `/` are stripped
/// - a pattern that still contains `/` gets a `**/` prefix
///
/// Negations (`!foo`) are not interpreted and come back as `!foo`.
pub fn translate_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.contains(DISABLED_CHARS) {
        trace!(line, "skipping .gitignore line with disabled character");
        return None;
    }

    let pattern = line.trim_matches('/');
    if pattern.is_empty() {
        return None;
    }

    if pattern.contains('/') {
        Some(format!("**/{pattern}"))
    } else {
        Some(pattern.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gi-gitignore-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn resolve_with(content: &str) -> PatternSet {
        let dir = temp_dir();
        std::fs::write(dir.join(GITIGNORE_FILE), content).unwrap();
        let patterns = resolve_gitignore(&dir).expect("resolve");
        let _ = std::fs::remove_dir_all(&dir);
        patterns
    }

    #[test]
    fn missing_gitignore_uses_defaults() {
        let dir = temp_dir();
        let patterns = resolve_gitignore(&dir).unwrap();
        assert_eq!(patterns, pattern_set(["__pycache__*", "*venv*"]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_gitignore_is_an_error() {
        let dir = temp_dir();
        std::fs::create_dir(dir.join(GITIGNORE_FILE)).unwrap();
        let result = resolve_gitignore(&dir);
        let _ = std::fs::remove_dir_all(&dir);
        assert!(matches!(result, Err(IngesterError::Io { .. })));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(translate_line("build/"), Some("build".into()));
        assert_eq!(translate_line("/dist"), Some("dist".into()));
    }

    #[test]
    fn nested_paths_match_at_any_depth() {
        assert_eq!(
            translate_line("src/generated"),
            Some("**/src/generated".into())
        );
        assert_eq!(
            translate_line("/docs/_build/"),
            Some("**/docs/_build".into())
        );
    }

    #[test]
    fn disabled_characters_drop_the_line() {
        assert_eq!(translate_line("a,b"), None);
        assert_eq!(translate_line("no[t]"), None);
        assert_eq!(translate_line("$HOME"), None);
        assert_eq!(translate_line("# comment"), None);
    }

    #[test]
    fn blank_lines_contribute_nothing() {
        assert_eq!(translate_line(""), None);
        assert_eq!(translate_line("   \t"), None);
        assert_eq!(translate_line("/"), None);
    }

    #[test]
    fn negation_passes_through_literally() {
        assert_eq!(translate_line("!keep.log"), Some("!keep.log".into()));
    }

    #[test]
    fn mixed_gitignore_scenario() {
        let patterns = resolve_with("__pycache__/\n*.log\nconfig,local\n");
        assert_eq!(patterns, pattern_set(["__pycache__", "*.log"]));
    }

    #[test]
    fn duplicates_collapse_and_whitespace_is_trimmed() {
        let patterns = resolve_with("  target/ \n\ntarget\n\n   \nnode_modules\n");
        assert_eq!(patterns, pattern_set(["target", "node_modules"]));
    }

    #[test]
    fn empty_or_sanitized_gitignore_is_empty_not_default() {
        assert!(resolve_with("").is_empty());
        assert!(resolve_with("# only a comment\n[abc]\n").is_empty());
    }
}
