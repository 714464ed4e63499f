//! Dataset file discovery.
//!
//! Two listings exist and they deliberately compare excluded directories
//! differently: compressed recordings are excluded by string prefix of the
//! containing directory, plain recordings only by exact directory match.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// How a directory path is compared against the exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeMatch {
    /// Directory path starts with an excluded entry. Plain string prefix,
    /// so `/data/raw` also excludes `/data/raw_old`.
    Prefix,
    /// Directory path equals an excluded entry.
    Exact,
}

impl ExcludeMatch {
    fn is_excluded(self, dir: &str, excluded: &[String]) -> bool {
        match self {
            ExcludeMatch::Prefix => excluded.iter().any(|ex| dir.starts_with(ex.as_str())),
            ExcludeMatch::Exact => excluded.iter().any(|ex| ex == dir),
        }
    }
}

/// How the compressed suffix is removed to find the decompressed sibling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixStrip {
    /// Remove one trailing occurrence of the suffix.
    #[default]
    Exact,
    /// Strip every trailing character that appears anywhere in the suffix.
    /// Matches listings produced by older tooling, e.g. `cams.tar.gz`
    /// with suffix `.tar.gz` becomes `cams` but `data.tar.gz` becomes `d`.
    CharClass,
}

impl SuffixStrip {
    pub fn strip<'a>(self, name: &'a str, suffix: &str) -> &'a str {
        match self {
            SuffixStrip::Exact => name.strip_suffix(suffix).unwrap_or(name),
            SuffixStrip::CharClass => name.trim_end_matches(|c: char| suffix.contains(c)),
        }
    }
}

/// Recursively list files under `root` whose name ends with `suffix`.
///
/// Directories are visited top-down, entries in lexical order; a
/// directory's own files come before its subdirectories. Files are skipped
/// when their containing directory is excluded, but excluded directories
/// are still descended into. Unreadable directories are logged and skipped.
pub fn find_files(root: &Path, suffix: &str, excluded: &[String], mode: ExcludeMatch) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "discovery root is not a directory");
        return out;
    }
    walk(root, suffix, excluded, mode, &mut out);
    out
}

fn walk(dir: &Path, suffix: &str, excluded: &[String], mode: ExcludeMatch, out: &mut Vec<PathBuf>) {
    let mut entries = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory; skipping");
            return;
        }
    };
    entries.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    let skip_files = mode.is_excluded(&dir.to_string_lossy(), excluded);
    for entry in entries {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            // symlinked directories are listed but not followed
            continue;
        } else if !skip_files && entry.file_name().to_string_lossy().ends_with(suffix) {
            out.push(path);
        }
    }

    for sub in subdirs {
        walk(&sub, suffix, excluded, mode, out);
    }
}

/// Whether `file` already has a decompressed sibling on disk.
pub fn is_decompressed(file: &Path, suffix: &str, strip: SuffixStrip) -> bool {
    let name = file.to_string_lossy();
    let stripped = strip.strip(&name, suffix);
    stripped != name && Path::new(stripped).exists()
}

/// Compressed recordings under `dataset_root` that still need decompressing.
pub fn list_compressed_files(config: &Config) -> Vec<PathBuf> {
    let suffix = config.compressed_data_suffix.as_str();
    let found = find_files(&config.dataset_root, suffix, &config.exclude_path, ExcludeMatch::Prefix);
    let total = found.len();
    let pending: Vec<PathBuf> = found
        .into_iter()
        .filter(|f| !is_decompressed(f, suffix, config.suffix_strip))
        .collect();

    tracing::info!(
        total,
        pending = pending.len(),
        suffix,
        "discovered compressed files"
    );
    pending
}

/// Plain recordings under `dataset_root`.
pub fn list_data_files(config: &Config) -> Vec<PathBuf> {
    let suffix = config.data_suffix.as_str();
    let files = find_files(&config.dataset_root, suffix, &config.exclude_path, ExcludeMatch::Exact);
    tracing::info!(count = files.len(), suffix, "discovered data files");
    files
}
