//! Per-invocation build identifier for bundle naming.

use std::time::{SystemTime, UNIX_EPOCH};

/// Unique-per-run token used to name bundle files.
///
/// Drawn once before the transform phase starts and passed explicitly to
/// the two bundlers and the reference rewriter; the HTML minifier and the
/// static copier never see it. Never persisted: each run's stamp invalidates
/// the previous run's bundle filenames, so stale caches cannot be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStamp(u128);

impl BuildStamp {
    /// Draw a fresh stamp from the wall clock (millisecond resolution).
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(millis)
    }

    /// Stamp with a known value (tests).
    #[cfg(test)]
    pub const fn from_millis(millis: u128) -> Self {
        Self(millis)
    }

    /// Filename of the CSS bundle for this run.
    pub fn css_bundle_name(&self) -> String {
        format!("bundle-{}.min.css", self.0)
    }

    /// Filename of the JS bundle for this run.
    pub fn js_bundle_name(&self) -> String {
        format!("bundle-{}.min.js", self.0)
    }

    /// Stylesheet href inserted into HTML, relative to the output root.
    pub fn css_href(&self) -> String {
        format!("assets/css/{}", self.css_bundle_name())
    }

    /// Script src inserted into HTML, relative to the output root.
    pub fn js_href(&self) -> String {
        format!("assets/js/{}", self.js_bundle_name())
    }
}
