//! Digest text rendering: per-file content blocks and the run summary.

use crate::tree::{DirNode, FileBody};

/// Rule printed above and below every file header.
const SEPARATOR: &str = "================================================";

/// Placeholder body for binary files.
pub const NON_TEXT_MARKER: &str = "[Non-text file]";

/// Concatenate every file in display order, each behind a `FILE:` header.
pub fn render_content(root: &DirNode) -> String {
    let mut out = String::new();
    for file in root.files() {
        let body = match &file.body {
            FileBody::Text(text) => text.as_str(),
            FileBody::NonText => NON_TEXT_MARKER,
        };
        out.push_str(&format!(
            "{SEPARATOR}\nFILE: {}\n{SEPARATOR}\n{body}\n\n",
            file.rel_path
        ));
    }
    out
}

/// The short report printed after a run.
pub fn render_summary(root_name: &str, file_count: usize, tree: &str, content: &str) -> String {
    let tokens = estimate_tokens(tree) + estimate_tokens(content);
    format!(
        "Directory: {root_name}\nFiles analyzed: {file_count}\n\nEstimated tokens: {}",
        format_tokens(tokens)
    )
}

/// Rough token count: four characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// `950`, `12.3k`, `1.2M`.
pub fn format_tokens(tokens: usize) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}
