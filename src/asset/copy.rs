//! Verbatim static asset copying.

use anyhow::{Context, Result, bail};
use std::{
    fs,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::config::SiteConfig;
use crate::debug;
use crate::logger::ProgressLine;

use super::scan::collect_files;

/// Output subdirectory for copied static assets.
pub const IMG_DIR: &str = "assets/img";

/// Copy static assets byte-for-byte into `output/assets/img/`.
///
/// By default files from every configured directory are flattened by
/// basename; with `preserve_static_paths` each file keeps its path
/// relative to its source directory. Missing source directories are
/// tolerated. When a sibling transform step trips `abort`, remaining
/// files are dropped. Returns the number of files copied.
pub fn copy_static(
    config: &SiteConfig,
    abort: &AtomicBool,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let dest_root = config.paths.output.join(IMG_DIR);
    let mut copied = 0;

    for dir in &config.paths.statics {
        if !dir.is_dir() {
            debug!("static"; "skipping missing '{}'", config.root_relative(dir).display());
            continue;
        }

        for file in collect_files(dir)? {
            if abort.load(Ordering::SeqCst) {
                bail!("aborted");
            }

            let dest = if config.paths.preserve_static_paths {
                match file.strip_prefix(dir) {
                    Ok(rel) => dest_root.join(rel),
                    Err(_) => continue,
                }
            } else {
                match file.file_name() {
                    Some(name) => dest_root.join(name),
                    None => continue,
                }
            };

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            fs::copy(&file, &dest).with_context(|| {
                format!("failed to copy '{}'", config.root_relative(&file).display())
            })?;

            copied += 1;
            if let Some(progress) = progress {
                progress.inc("static");
            }
        }
    }

    Ok(copied)
}
