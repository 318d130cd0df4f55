//! Stylesheet and script bundling.
//!
//! Each bundler reads its configured file list in order, concatenates the
//! contents, minifies the result, and writes a single stamped bundle file
//! under the output root. The stamp in the filename ties the bundle to one
//! build, so the rewriter can insert references that can never point at a
//! previous run's output.

use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::SiteConfig;
use crate::core::BuildStamp;
use crate::debug;

use super::minify::{minify_css, minify_js};

/// Output subdirectory for the CSS bundle.
pub const CSS_DIR: &str = "assets/css";

/// Output subdirectory for the JS bundle.
pub const JS_DIR: &str = "assets/js";

/// Concatenate, minify, and write the stylesheet bundle.
///
/// Missing entries are skipped with a debug note; the bundle is written
/// even when every entry is missing, so the href the rewriter inserts
/// always resolves. Returns the written bundle path.
pub fn bundle_css(config: &SiteConfig, stamp: BuildStamp) -> Result<PathBuf> {
    let mut concat = String::new();
    for path in &config.paths.css {
        match fs::read_to_string(path) {
            Ok(content) => push_concat(&mut concat, &content),
            Err(_) => {
                debug!("css"; "skipping missing '{}'", config.root_relative(path).display());
            }
        }
    }

    let minified = minify_css(&concat).context("css bundle failed to minify")?;
    let out = config
        .paths
        .output
        .join(CSS_DIR)
        .join(stamp.css_bundle_name());
    write_bundle(&out, &minified)?;

    debug!("css"; "wrote {} ({} bytes)", config.root_relative(&out).display(), minified.len());
    Ok(out)
}

/// Concatenate, minify, and write the script bundle.
///
/// Unlike CSS, a missing script is fatal: scripts later in the list may
/// depend on globals defined by earlier ones, so a silent gap would ship
/// broken behavior rather than a cosmetic regression.
pub fn bundle_js(config: &SiteConfig, stamp: BuildStamp) -> Result<PathBuf> {
    let mut concat = String::new();
    for path in &config.paths.js {
        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "missing script '{}'",
                config.root_relative(path).display()
            )
        })?;
        push_concat(&mut concat, &content);
    }

    if concat.is_empty() {
        bail!("script list produced no content");
    }

    let minified = minify_js(&concat).context("js bundle failed to minify")?;
    let out = config
        .paths
        .output
        .join(JS_DIR)
        .join(stamp.js_bundle_name());
    write_bundle(&out, &minified)?;

    debug!("js"; "wrote {} ({} bytes)", config.root_relative(&out).display(), minified.len());
    Ok(out)
}

/// Append one input to the bundle, guaranteeing a newline boundary.
///
/// A file ending in `// comment` or missing its trailing semicolon must
/// not fuse with the first line of the next file.
fn push_concat(concat: &mut String, content: &str) {
    concat.push_str(content);
    if !concat.ends_with('\n') {
        concat.push('\n');
    }
}

fn write_bundle(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write '{}'", path.display()))
}
