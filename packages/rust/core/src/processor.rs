//! Single-run orchestration: resolve patterns, ingest, report.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, instrument};

use gitingester_ingest::{IngestRequest, Ingestor};
use gitingester_patterns::resolve_gitignore;
use gitingester_shared::{
    DEFAULT_MAX_FILE_SIZE, IngesterError, PatternSet, Result, format_pattern_set,
};

/// Label used for errors writing the report sink.
const REPORT_SINK: &str = "<stdout>";

/// Options for one [`process_directory`] run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Print the resolved include/exclude sets before ingesting. Default `false`.
    pub debug: bool,
    /// Whitelist; `None` (the default) keeps every file not excluded.
    pub include_patterns: Option<PatternSet>,
    /// Extra excludes merged with the `.gitignore` ones. `None` (the
    /// default) is the same as an empty set.
    pub exclude_patterns: Option<PatternSet>,
    /// Files above this many bytes are skipped. Default 20 KiB.
    pub max_file_size: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            debug: false,
            include_patterns: None,
            exclude_patterns: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Union of the `.gitignore`-derived excludes and the caller's excludes.
pub fn merge_excludes(gitignore: PatternSet, caller: Option<&PatternSet>) -> PatternSet {
    let mut merged = gitignore;
    if let Some(caller) = caller {
        merged.extend(caller.iter().cloned());
    }
    merged
}

/// Resolve `.gitignore` in `input_dir` and merge in `caller`.
pub fn effective_excludes(input_dir: &Path, caller: Option<&PatternSet>) -> Result<PatternSet> {
    let gitignore = resolve_gitignore(input_dir)?;
    Ok(merge_excludes(gitignore, caller))
}

/// Ingest `input_dir` into `output_path`, writing the report to `out`.
///
/// Creates the output's parent directory when missing. Every error is
/// returned as-is; nothing is cleaned up on failure.
#[instrument(skip_all, fields(input = %input_dir.display(), output = %output_path.display()))]
pub fn process_directory(
    input_dir: &Path,
    output_path: &Path,
    options: &ProcessOptions,
    ingestor: &dyn Ingestor,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| IngesterError::io(parent, e))?;
            debug!(dir = %parent.display(), "created output directory");
        }
    }

    let excludes = effective_excludes(input_dir, options.exclude_patterns.as_ref())?;
    let includes = options.include_patterns.as_ref();

    if options.debug {
        writeln!(
            out,
            "\ninclude patterns:\n{};\n\nexclude patterns:\n{}\n",
            format_pattern_set(includes),
            format_pattern_set(Some(&excludes)),
        )
        .map_err(|e| IngesterError::io(REPORT_SINK, e))?;
    }

    info!(
        includes = includes.map_or(0, PatternSet::len),
        excludes = excludes.len(),
        max_file_size = options.max_file_size,
        "ingesting directory"
    );

    let request = IngestRequest {
        source: input_dir,
        max_file_size: options.max_file_size,
        output: Some(output_path),
        include_patterns: includes,
        exclude_patterns: &excludes,
    };
    let digest = ingestor.ingest(&request)?;

    writeln!(out, "Summary\n===================\n{}", digest.summary)
        .and_then(|()| writeln!(out, "Output: {}", output_path.display()))
        .map_err(|e| IngesterError::io(REPORT_SINK, e))?;

    Ok(())
}
