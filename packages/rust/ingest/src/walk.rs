//! Filesystem walk: applies patterns and limits, reads kept files.

use std::io::Read;
use std::path::{Component, Path};

use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use gitingester_patterns::PatternMatcher;
use gitingester_shared::{IngesterError, Result};

use crate::tree::{DirNode, FileBody, FileNode};
use crate::{IngestLimits, ProgressReporter};

/// Always excluded, on top of whatever the caller asks for.
pub const BUILTIN_EXCLUDES: [&str; 4] = [".git", ".hg", ".svn", ".DS_Store"];

/// Bytes inspected when deciding whether a file is text.
const SNIFF_LEN: usize = 8 * 1024;

/// Outcome of a walk.
#[derive(Debug)]
pub struct WalkOutput {
    pub root: DirNode,
    pub file_count: usize,
    pub total_size: u64,
    /// At least one directory sat at the depth limit and was not descended.
    pub depth_limited: bool,
}

/// Filters applied during a walk.
pub struct WalkFilter<'a> {
    pub include: Option<&'a PatternMatcher>,
    pub exclude: &'a PatternMatcher,
    pub max_file_size: u64,
    pub limits: &'a IngestLimits,
}

/// Walk `source`, keeping files that pass `filter`.
pub fn walk(
    source: &Path,
    root_name: &str,
    filter: &WalkFilter<'_>,
    progress: &dyn ProgressReporter,
) -> Result<WalkOutput> {
    let mut root = DirNode::new(root_name);
    let mut file_count = 0usize;
    let mut total_size = 0u64;
    let mut depth_limited = false;
    let max_depth = filter.limits.max_depth;

    let walker = WalkDir::new(source)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(source, entry, filter.exclude));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(source, e))?;

        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_dir() {
            if entry.depth() == max_depth {
                if !depth_limited {
                    warn!(max_depth, "depth limit reached, deeper entries are skipped");
                }
                debug!(path = %entry.path().display(), "not descending past depth limit");
                depth_limited = true;
            }
            continue;
        }
        if entry.file_type().is_symlink() {
            trace!(path = %entry.path().display(), "skipping symlink");
            continue;
        }

        let rel = rel_path(source, entry.path());

        if let Some(include) = filter.include {
            if !include.is_match_or_ancestor(&rel) {
                trace!(path = %rel, "not matched by include patterns");
                continue;
            }
        }

        let size = entry
            .metadata()
            .map_err(|e| walk_error(source, e))?
            .len();

        if size > filter.max_file_size {
            debug!(path = %rel, size, max = filter.max_file_size, "skipping oversized file");
            continue;
        }

        if file_count >= filter.limits.max_files {
            warn!(max_files = filter.limits.max_files, "file limit reached, stopping walk");
            break;
        }
        if total_size + size > filter.limits.max_total_size {
            warn!(
                max_total_size = filter.limits.max_total_size,
                "total size limit reached, stopping walk"
            );
            break;
        }

        let body = read_body(entry.path())?;
        let parts: Vec<&str> = rel.split('/').collect();
        let (name, parents) = parts
            .split_last()
            .map(|(name, parents)| (name.to_string(), parents))
            .unwrap_or_default();

        root.insert(
            parents,
            FileNode {
                name,
                rel_path: rel.clone(),
                size,
                body,
            },
        );

        file_count += 1;
        total_size += size;
        progress.file_collected(&rel, file_count);
    }

    root.sort();
    debug!(file_count, total_size, "walk complete");

    Ok(WalkOutput {
        root,
        file_count,
        total_size,
        depth_limited,
    })
}

fn is_excluded(source: &Path, entry: &DirEntry, exclude: &PatternMatcher) -> bool {
    let rel = rel_path(source, entry.path());
    match exclude.find(&rel) {
        Some(glob) => {
            trace!(path = %rel, pattern = glob.as_str(), "excluded");
            true
        }
        None => false,
    }
}

/// `/`-separated path of `path` relative to `source`.
pub fn rel_path(source: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(source).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file, classifying it as text or non-text.
fn read_body(path: &Path) -> Result<FileBody> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| IngesterError::io(path, e))?;

    let sniff = &bytes[..bytes.len().min(SNIFF_LEN)];
    if sniff.contains(&0) {
        return Ok(FileBody::NonText);
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(FileBody::Text(text)),
        Err(_) => Ok(FileBody::NonText),
    }
}

fn walk_error(source: &Path, err: walkdir::Error) -> IngesterError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source.to_path_buf());
    let message = err.to_string();
    let io = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    IngesterError::io(path, io)
}
