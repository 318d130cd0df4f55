//! Bundle reference rewriting.
//!
//! After the bundlers have written their stamped files, every HTML
//! document in the output tree is rewritten: existing stylesheet links
//! and external script tags are stripped, then exactly one reference to
//! each bundle is inserted. Inline `<script>` and `<style>` blocks are
//! never touched.

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use std::{fs, sync::LazyLock};

use crate::asset::collect_with_ext;
use crate::config::SiteConfig;
use crate::core::BuildStamp;
use crate::debug;

/// Any `<link>` carrying rel=stylesheet, whatever else it carries.
static STYLESHEET_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link[^>]*rel=["']?stylesheet["']?[^>]*>"#).unwrap());

/// A `<script>` tag with a `src` ending in `.js`, plus its closing tag.
/// Inline scripts have no `src` and never match.
static EXTERNAL_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]*src=["']?[^"'>]*\.js["']?[^>]*>\s*</script>"#).unwrap()
});

static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head>").unwrap());

static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body>").unwrap());

/// Rewrite one document's bundle references.
///
/// Removal is unconditional; insertion requires the anchor tag. A
/// document without `</head>` gets no stylesheet link, one without
/// `</body>` gets no script tag. Hrefs are output-root-relative, so
/// documents in subdirectories are expected to be served with a matching
/// base path.
pub fn rewrite_document(html: &str, stamp: BuildStamp) -> String {
    let html = STYLESHEET_LINK.replace_all(html, "");
    let html = EXTERNAL_SCRIPT.replace_all(&html, "");

    let link = format!("<link rel=\"stylesheet\" href=\"{}\"></head>", stamp.css_href());
    let html = HEAD_CLOSE.replace(&html, NoExpand(&link));

    let script = format!("<script src=\"{}\"></script></body>", stamp.js_href());
    BODY_CLOSE.replace(&html, NoExpand(&script)).into_owned()
}

/// Rewrite every `.html` document under the output tree in place.
/// Returns the number of documents rewritten.
pub fn rewrite_tree(config: &SiteConfig, stamp: BuildStamp) -> Result<usize> {
    let files = collect_with_ext(&config.paths.output, "html")?;

    for path in &files {
        let html = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let rewritten = rewrite_document(&html, stamp);
        fs::write(path, rewritten)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        debug!("rewrite"; "{}", config.root_relative(path).display());
    }

    Ok(files.len())
}
