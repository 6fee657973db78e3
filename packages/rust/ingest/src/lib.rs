//! Directory ingestion: walk a source tree and render a text digest.
//!
//! This crate provides:
//! - [`Ingestor`] — the boundary the processor calls through
//! - [`FsIngestor`] — the filesystem implementation
//! - [`tree`] / [`render`] — the tree and digest text builders

pub mod render;
pub mod tree;
pub mod walk;

use std::path::Path;

use tracing::{info, instrument};

use gitingester_patterns::PatternMatcher;
use gitingester_shared::{IngestDigest, IngesterError, LimitsConfig, PatternSet, Result};

use crate::walk::{BUILTIN_EXCLUDES, WalkFilter};

// ---------------------------------------------------------------------------
// Request / limits
// ---------------------------------------------------------------------------

/// Everything one ingestion run needs.
#[derive(Debug, Clone, Copy)]
pub struct IngestRequest<'a> {
    /// Directory to ingest.
    pub source: &'a Path,
    /// Files above this many bytes are skipped.
    pub max_file_size: u64,
    /// Where to write the digest; `None` skips writing.
    pub output: Option<&'a Path>,
    /// When present, only files matching one of these are kept.
    pub include_patterns: Option<&'a PatternSet>,
    /// Files and directories matching any of these are skipped.
    pub exclude_patterns: &'a PatternSet,
}

/// Safety limits for a walk.
#[derive(Debug, Clone)]
pub struct IngestLimits {
    pub max_files: usize,
    pub max_depth: usize,
    pub max_total_size: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

impl From<&LimitsConfig> for IngestLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_files: config.max_files,
            max_depth: config.max_depth,
            max_total_size: config.max_total_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Produces a digest for a directory.
pub trait Ingestor {
    /// Ingest `request.source`, writing the digest to `request.output` when set.
    fn ingest(&self, request: &IngestRequest<'_>) -> Result<IngestDigest>;
}

/// Progress callback for reporting walk status.
pub trait ProgressReporter {
    /// Called after each kept file.
    fn file_collected(&self, rel_path: &str, count: usize);
    /// Called once the digest is rendered.
    fn done(&self, file_count: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn file_collected(&self, _rel_path: &str, _count: usize) {}
    fn done(&self, _file_count: usize) {}
}

// ---------------------------------------------------------------------------
// FsIngestor
// ---------------------------------------------------------------------------

/// Ingests a directory from the local filesystem.
pub struct FsIngestor<'p> {
    limits: IngestLimits,
    progress: &'p dyn ProgressReporter,
}

impl FsIngestor<'static> {
    pub fn new(limits: IngestLimits) -> Self {
        Self {
            limits,
            progress: &SilentProgress,
        }
    }
}

impl<'p> FsIngestor<'p> {
    pub fn with_progress(limits: IngestLimits, progress: &'p dyn ProgressReporter) -> Self {
        Self { limits, progress }
    }
}

impl Ingestor for FsIngestor<'_> {
    #[instrument(skip_all, fields(source = %request.source.display()))]
    fn ingest(&self, request: &IngestRequest<'_>) -> Result<IngestDigest> {
        let source = request.source;
        if !source.is_dir() {
            return Err(IngesterError::validation(format!(
                "'{}' is not a directory",
                source.display()
            )));
        }

        let include = request
            .include_patterns
            .map(PatternMatcher::new)
            .transpose()?;
        let mut exclude = PatternMatcher::new(request.exclude_patterns)?;
        for pattern in BUILTIN_EXCLUDES {
            exclude.push(pattern)?;
        }

        let filter = WalkFilter {
            include: include.as_ref(),
            exclude: &exclude,
            max_file_size: request.max_file_size,
            limits: &self.limits,
        };

        let root_name = source_name(source);
        let walked = walk::walk(source, &root_name, &filter, self.progress)?;

        let tree = walked.root.render();
        let content = render::render_content(&walked.root);
        let summary = render::render_summary(&root_name, walked.file_count, &tree, &content);
        let digest = IngestDigest {
            summary,
            tree,
            content,
        };

        if let Some(output) = request.output {
            std::fs::write(output, digest.to_file_text())
                .map_err(|e| IngesterError::io(output, e))?;
        }

        info!(
            files = walked.file_count,
            bytes = walked.total_size,
            "ingestion complete"
        );
        self.progress.done(walked.file_count);

        Ok(digest)
    }
}

/// Display name for a directory: its last component, falling back to the
/// canonical path's last component (for `.` and the like), then `root`.
pub fn source_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }

    std::fs::canonicalize(dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "root".to_string())
}
