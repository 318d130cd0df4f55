//! `[paths]` section configuration.
//!
//! Declares every input category and the output root:
//!
//! ```toml
//! [paths]
//! source = "src"                       # scanned for *.html
//! css = ["src/assets/css/base.css", "src/assets/css/theme.css"]
//! js = ["src/assets/js/app.js", "src/assets/js/nav.js"]
//! static = ["src/assets/svg", "src/assets/img"]
//! output = "dist"
//! ```
//!
//! The `css` and `js` lists are ordered: CSS order is cascade order, JS
//! order is execution order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::normalize_path;

use super::ValidationErrors;

/// Input and output path declarations.
///
/// Owned by the orchestrator and read-only to every pipeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned recursively for HTML inputs.
    pub source: PathBuf,

    /// Ordered stylesheet list; later files win the cascade.
    pub css: Vec<PathBuf>,

    /// Ordered script list; execution follows list order.
    pub js: Vec<PathBuf>,

    /// Directories of image/vector assets copied verbatim.
    #[serde(rename = "static")]
    pub statics: Vec<PathBuf>,

    /// Output root, fully owned by the pipeline (deleted and rebuilt).
    pub output: PathBuf,

    /// Keep static files' paths relative to their directory instead of
    /// flattening by basename.
    pub preserve_static_paths: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            css: vec![],
            js: vec![],
            statics: vec![],
            output: PathBuf::from("dist"),
            preserve_static_paths: false,
        }
    }
}

impl PathsConfig {
    /// Validate raw paths before normalization.
    ///
    /// MUST be called before `normalize()` - after normalization all paths
    /// become absolute (joined with root), making the safety check
    /// impossible.
    pub fn validate_raw(&self, diag: &mut ValidationErrors) {
        Self::check_path_safety(&self.source, "paths.source", diag);
        Self::check_path_safety(&self.output, "paths.output", diag);
        for path in &self.css {
            Self::check_path_safety(path, "paths.css", diag);
        }
        for path in &self.js {
            Self::check_path_safety(path, "paths.js", diag);
        }
        for path in &self.statics {
            Self::check_path_safety(path, "paths.static", diag);
        }

        // An empty bundle list is missing required input, not an empty match
        if self.css.is_empty() {
            diag.error("paths.css", "must list at least one stylesheet");
        }
        if self.js.is_empty() {
            diag.error("paths.js", "must list at least one script");
        }
    }

    /// Check a single path for unsafe components (`..` or absolute).
    fn check_path_safety(path: &Path, field: &'static str, diag: &mut ValidationErrors) {
        use std::path::Component;

        for comp in path.components() {
            let msg = match comp {
                Component::ParentDir => Some("parent directory '..' not allowed"),
                Component::Prefix(_) | Component::RootDir => Some("absolute paths not allowed"),
                _ => None,
            };
            if let Some(reason) = msg {
                diag.error(field, format!("path '{}': {reason}", path.display()));
            }
        }
    }

    /// Validate after normalization: checks that only make sense against
    /// the real filesystem.
    pub fn validate(&self, diag: &mut ValidationErrors) {
        if !self.source.is_dir() {
            diag.error(
                "paths.source",
                format!("'{}' is not a directory", self.source.display()),
            );
        }

        for dir in &self.statics {
            // Missing static dirs are tolerated at build time; an existing
            // non-directory entry is a config mistake
            if dir.exists() && !dir.is_dir() {
                diag.error(
                    "paths.static",
                    format!("'{}' must be a directory", dir.display()),
                );
            }
        }
    }

    /// Normalize all paths relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = normalize_path(&root.join(&self.source));
        self.output = normalize_path(&root.join(&self.output));
        for path in &mut self.css {
            *path = normalize_path(&root.join(&*path));
        }
        for path in &mut self.js {
            *path = normalize_path(&root.join(&*path));
        }
        for path in &mut self.statics {
            *path = normalize_path(&root.join(&*path));
        }
    }
}
