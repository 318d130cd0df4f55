//! Source tree scanning.

use anyhow::{Context, Result};
use jwalk::{Parallelism, WalkDir};
use std::path::{Path, PathBuf};

const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Collect all files from a directory recursively.
///
/// The walk is serial: callers sit inside rayon workers, and a nested
/// parallel walk on the shared pool yields nothing there. A missing
/// directory yields an empty list; any other walk error is propagated.
/// Entries are sorted so later steps see a deterministic order.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .parallelism(Parallelism::Serial)
        .sort(true)
    {
        let entry = entry.with_context(|| format!("failed to walk '{}'", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        files.push(entry.path());
    }
    Ok(files)
}

/// Collect files with the given extension (case-insensitive).
pub fn collect_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let files = collect_files(dir)?
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
        .collect();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.html"), "<p>a</p>").unwrap();
        fs::write(dir.path().join("sub/b.html"), "<p>b</p>").unwrap();
        fs::write(dir.path().join(".DS_Store"), "junk").unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_missing_dir_is_empty() {
        let files = collect_files(Path::new("/nonexistent/source/tree")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_with_ext_filters() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        fs::write(dir.path().join("page.HTML"), "").unwrap();
        fs::write(dir.path().join("style.css"), "").unwrap();

        let html = collect_with_ext(dir.path(), "html").unwrap();
        assert_eq!(html.len(), 2);
    }

    #[test]
    fn test_collect_inside_parallel_workers() {
        // The transform steps call these from inside rayon::join; the walk
        // must see the same files there as from the main thread
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        fs::write(dir.path().join("sub/logo.svg"), "").unwrap();

        let direct = collect_files(dir.path()).unwrap().len();
        let (all, html) = rayon::join(
            || collect_files(dir.path()).unwrap().len(),
            || collect_with_ext(dir.path(), "html").unwrap().len(),
        );
        assert_eq!(all, direct);
        assert_eq!(html, 1);
    }
}
