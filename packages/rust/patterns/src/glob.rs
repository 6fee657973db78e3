//! Glob matching for include/exclude pattern sets.
//!
//! Dialect:
//! - `*` matches within one path segment, `?` matches one non-`/` char
//! - `**` crosses segments, and a `**/` prefix also matches zero segments
//! - everything else is literal
//!
//! A pattern without `/` is tested against an entry's file name, so it
//! applies at any depth. A pattern with `/` is tested against the whole
//! `/`-separated path relative to the ingestion root. A trailing `/`
//! (`docs/`) is dropped before compiling, so it names the directory itself.

use regex::Regex;

use gitingester_shared::{IngesterError, PatternSet, Result};

/// One compiled glob.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    regex: Regex,
    match_full_path: bool,
}

impl Glob {
    /// Compile a glob pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let body = match pattern.trim_end_matches('/') {
            "" => pattern,
            trimmed => trimmed,
        };
        let regex = glob_to_regex(body)?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            match_full_path: body.contains('/'),
        })
    }

    /// The pattern text this glob was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a `/`-separated path relative to the ingestion root.
    pub fn is_match(&self, rel_path: &str) -> bool {
        if self.match_full_path {
            self.regex.is_match(rel_path)
        } else {
            let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
            self.regex.is_match(name)
        }
    }
}

/// A compiled [`PatternSet`]; matches if any member matches.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    globs: Vec<Glob>,
}

impl PatternMatcher {
    /// Compile every pattern in the set.
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        let globs = patterns
            .iter()
            .map(|p| Glob::new(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { globs })
    }

    /// Add one more pattern to an existing matcher.
    pub fn push(&mut self, pattern: &str) -> Result<()> {
        self.globs.push(Glob::new(pattern)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.globs.len()
    }

    /// The first glob matching `rel_path`, if any.
    pub fn find(&self, rel_path: &str) -> Option<&Glob> {
        self.globs.iter().find(|g| g.is_match(rel_path))
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.find(rel_path).is_some()
    }

    /// Like [`is_match`](Self::is_match), but also true when any ancestor
    /// directory of `rel_path` matches.
    pub fn is_match_or_ancestor(&self, rel_path: &str) -> bool {
        if self.is_match(rel_path) {
            return true;
        }
        rel_path
            .match_indices('/')
            .any(|(idx, _)| self.is_match(&rel_path[..idx]))
    }
}

/// Convert a glob pattern to an anchored regex.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*\*/", "(?:.*/)?")
        .replace(r"\*\*", ".*")
        .replace(r"\*", "[^/]*")
        .replace(r"\?", "[^/]");
    Regex::new(&format!("^{escaped}$")).map_err(|e| IngesterError::pattern(pattern, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitingester_shared::pattern_set;

    fn glob(p: &str) -> Glob {
        Glob::new(p).expect("compile")
    }

    #[test]
    fn bare_name_matches_at_any_depth() {
        let g = glob("build");
        assert!(g.is_match("build"));
        assert!(g.is_match("crates/app/build"));
        assert!(!g.is_match("builder"));
    }

    #[test]
    fn star_stays_within_a_segment() {
        let g = glob("*.log");
        assert!(g.is_match("app.log"));
        assert!(g.is_match("logs/2024/app.log"));
        assert!(!g.is_match("app.log.gz"));

        let g = glob("src/*.rs");
        assert!(g.is_match("src/main.rs"));
        assert!(!g.is_match("src/bin/tool.rs"));
    }

    #[test]
    fn double_star_prefix_matches_zero_or_more_dirs() {
        let g = glob("**/src/generated");
        assert!(g.is_match("src/generated"));
        assert!(g.is_match("pkg/a/src/generated"));
        assert!(!g.is_match("src/generated_old"));
    }

    #[test]
    fn default_excludes_hit_cache_and_venv_dirs() {
        let m = PatternMatcher::new(&pattern_set(["__pycache__*", "*venv*"])).unwrap();
        assert!(m.is_match("pkg/__pycache__"));
        assert!(m.is_match(".venv"));
        assert!(m.is_match("tools/venv"));
        assert!(!m.is_match("src/main.py"));
    }

    #[test]
    fn special_characters_are_literal() {
        let g = glob("!keep.log");
        assert!(g.is_match("!keep.log"));
        assert!(!g.is_match("keep.log"));

        let g = glob("a+b(1).txt");
        assert!(g.is_match("dir/a+b(1).txt"));
    }

    #[test]
    fn question_mark_matches_single_char() {
        let g = glob("file?.txt");
        assert!(g.is_match("file1.txt"));
        assert!(!g.is_match("file12.txt"));
    }

    #[test]
    fn trailing_slash_names_the_directory() {
        let g = glob("docs/");
        assert_eq!(g.as_str(), "docs/");
        assert!(g.is_match("docs"));
        assert!(g.is_match("site/docs"));
        assert!(!g.is_match("docs.md"));

        let g = glob("site/docs/");
        assert!(g.is_match("site/docs"));
        assert!(!g.is_match("docs"));
    }

    #[test]
    fn ancestor_directories_count_for_matching() {
        let m = PatternMatcher::new(&pattern_set(["docs"])).unwrap();
        assert!(m.is_match_or_ancestor("docs/guide/a.md"));
        assert!(m.is_match_or_ancestor("pkg/docs/a.md"));
        assert!(!m.is_match_or_ancestor("src/docs.rs"));
        assert!(!m.is_match("docs/guide/a.md"));
    }

    #[test]
    fn matcher_reports_first_hit() {
        let mut m = PatternMatcher::default();
        assert!(m.is_empty());
        m.push("*.md").unwrap();
        m.push("docs").unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.find("README.md").map(Glob::as_str), Some("*.md"));
        assert!(m.find("src/lib.rs").is_none());
    }
}
