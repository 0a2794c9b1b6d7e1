use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::core::parsers::FileKind;

/// A source file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root, with `/` separators.
    pub relative: String,
    pub kind: FileKind,
}

/// Result of scanning files.
pub struct ScanResult {
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

/// Convert a path under `root` to a `/`-separated relative path.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `source_root` and collect every file the config selects.
///
/// `excluded_roots` are absolute directories never descended into (the
/// output and backup directories). Results are sorted by relative path.
pub fn scan_files(
    project_root: &Path,
    source_root: &Path,
    config: &Config,
    excluded_roots: &[PathBuf],
) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let file_patterns: Vec<Pattern> = config
        .exclude_files
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("invalid exclude pattern '{}': {}", p, e);
                None
            }
        })
        .collect();

    let is_excluded_dir = |entry: &DirEntry| {
        entry.file_type().is_dir()
            && entry.depth() > 0
            && (config
                .exclude_dirs
                .iter()
                .any(|d| entry.file_name().to_string_lossy() == d.as_str())
                || excluded_roots.iter().any(|r| entry.path().starts_with(r)))
    };

    for entry in WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                tracing::warn!("cannot access path: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !has_configured_extension(path, config) {
            continue;
        }

        let relative = relative_path(project_root, path);
        let file_name = entry.file_name().to_string_lossy();
        if file_patterns
            .iter()
            .any(|p| p.matches(&file_name) || p.matches(&relative))
        {
            continue;
        }

        let Some(kind) = FileKind::from_path(path) else {
            continue;
        };
        files.push(SourceFile {
            path: path.to_path_buf(),
            relative,
            kind,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));

    ScanResult {
        files,
        skipped_count,
    }
}

fn has_configured_extension(path: &Path, config: &Config) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    config
        .file_extensions
        .iter()
        .any(|configured| configured.trim_start_matches('.') == ext)
}
