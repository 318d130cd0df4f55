//! Whole-document HTML minification.

use anyhow::{Context, Result, anyhow, bail};
use minify_html::Cfg;
use rayon::prelude::*;
use std::{
    fs,
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::asset::collect_with_ext;
use crate::config::SiteConfig;
use crate::logger::ProgressLine;

/// Minification settings for page documents.
///
/// `keep_closing_tags` and `keep_html_and_head_opening_tags` are
/// load-bearing: the reference rewriter anchors its insertions on
/// `</head>` and `</body>`, so those tags must survive minification.
static MINIFY_CFG: LazyLock<Cfg> = LazyLock::new(|| Cfg {
    minify_js: true,
    minify_css: true,
    keep_closing_tags: true,
    keep_html_and_head_opening_tags: true,
    keep_comments: false,
    ..Cfg::default()
});

/// Minify a single HTML document.
pub fn minify_document(html: &str) -> Result<String> {
    let minified = minify_html::minify(html.as_bytes(), &MINIFY_CFG);
    String::from_utf8(minified).map_err(|_| anyhow!("minification produced invalid UTF-8"))
}

/// Minify every `.html` file under the source tree into the output tree,
/// preserving relative paths.
///
/// Files are processed in parallel. When a sibling transform step trips
/// `abort`, remaining work is dropped. Returns the number of documents
/// written.
pub fn minify_tree(
    config: &SiteConfig,
    abort: &AtomicBool,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let files = collect_with_ext(&config.paths.source, "html")?;

    files.par_iter().try_for_each(|src| {
        if abort.load(Ordering::SeqCst) {
            bail!("aborted");
        }

        let rel = src
            .strip_prefix(&config.paths.source)
            .map_err(|_| anyhow!("'{}' escaped the source tree", src.display()))?;
        let dest = config.paths.output.join(rel);

        let html = fs::read_to_string(src)
            .with_context(|| format!("failed to read '{}'", config.root_relative(src).display()))?;
        let minified = minify_document(&html)
            .with_context(|| format!("'{}'", config.root_relative(src).display()))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&dest, minified)
            .with_context(|| format!("failed to write '{}'", dest.display()))?;

        if let Some(progress) = progress {
            progress.inc("html");
        }
        Ok(())
    })?;

    Ok(files.len())
}
