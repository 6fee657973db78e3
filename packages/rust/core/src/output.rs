//! Digest file naming.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use gitingester_ingest::source_name;

/// Minute-resolution timestamp embedded in digest file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d@%H-%M";

/// `<output_root>/<dir-name>@<YYYY-MM-DD>@<HH-MM>[-<suffix>].txt`
///
/// An empty suffix is treated as absent.
pub fn build_output_path(
    output_root: &Path,
    input_dir: &Path,
    timestamp: NaiveDateTime,
    suffix: Option<&str>,
) -> PathBuf {
    let name = source_name(input_dir);
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    let suffix = match suffix {
        Some(s) if !s.is_empty() => format!("-{s}"),
        _ => String::new(),
    };
    output_root.join(format!("{name}@{stamp}{suffix}.txt"))
}
