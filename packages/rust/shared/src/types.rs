//! Core domain types shared by the resolver, processor, and ingestor.

use std::collections::BTreeSet;
use std::fmt::Write as _;

/// A set of glob-style patterns.
///
/// Uniqueness is what matters; the ordered set only keeps debug output
/// stable between runs.
pub type PatternSet = BTreeSet<String>;

/// Build a [`PatternSet`] from anything yielding string-like items.
pub fn pattern_set<I, S>(patterns: I) -> PatternSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    patterns.into_iter().map(Into::into).collect()
}

/// Render an optional pattern set as `{"a", "b"}`, or `None` when absent.
pub fn format_pattern_set(set: Option<&PatternSet>) -> String {
    let Some(set) = set else {
        return "None".to_string();
    };

    let mut out = String::from("{");
    for (i, pattern) in set.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "'{pattern}'");
    }
    out.push('}');
    out
}

// ---------------------------------------------------------------------------
// IngestDigest
// ---------------------------------------------------------------------------

/// The three text sections produced by one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestDigest {
    /// Short human-readable report (directory, file count, token estimate).
    pub summary: String,
    /// Rendered directory tree.
    pub tree: String,
    /// Concatenated file contents with per-file headers.
    pub content: String,
}

impl IngestDigest {
    /// The text written to the digest file: tree, blank line, content.
    pub fn to_file_text(&self) -> String {
        format!("{}\n{}", self.tree, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_set_dedupes() {
        let set = pattern_set(["*.log", "build", "*.log"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("build"));
    }

    #[test]
    fn format_present_and_absent_sets() {
        assert_eq!(format_pattern_set(None), "None");
        assert_eq!(format_pattern_set(Some(&PatternSet::new())), "{}");

        let set = pattern_set(["b", "a"]);
        assert_eq!(format_pattern_set(Some(&set)), "{'a', 'b'}");
    }

    #[test]
    fn digest_file_text_joins_tree_and_content() {
        let digest = IngestDigest {
            summary: "Directory: x".into(),
            tree: "Directory structure:\n└── x/\n".into(),
            content: "FILE: a\n".into(),
        };
        assert_eq!(
            digest.to_file_text(),
            "Directory structure:\n└── x/\n\nFILE: a\n"
        );
    }
}
