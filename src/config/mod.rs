//! Project configuration management for `sitepack.toml`.
//!
//! The config file is located by searching upward from the current
//! directory; its parent directory becomes the project root, and every
//! `[paths]` entry is normalized against that root before the pipeline
//! sees it.

mod error;
mod paths;

pub use error::{ConfigError, ValidationErrors};
pub use paths::PathsConfig;

use crate::cli::{Cli, Commands};
use crate::log;
use crate::utils::normalize_path;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing sitepack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Input and output paths
    #[serde(default)]
    pub paths: PathsConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is determined by the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            log!("error"; "config file '{}' not found", cli.config.display());
            bail!("missing config file");
        };

        let mut config = Self::from_path(&config_path)?;
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;

        // Path safety must be checked before normalization makes
        // everything absolute
        let mut diag = ValidationErrors::new();
        config.paths.validate_raw(&mut diag);
        diag.into_result().map_err(ConfigError::Validation)?;

        let root = config.root.clone();
        config.paths.normalize(&root);
        config.apply_command_options(cli);

        let mut diag = ValidationErrors::new();
        config.paths.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Validation)?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[allow(dead_code)] // test constructor
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only filename since it's always at the project root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Build { args } = &cli.command
            && let Some(output) = &args.output
        {
            self.paths.output = normalize_path(&self.root.join(output));
        }
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding
/// `config_name`. Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path that exists
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_minimal() {
        let config = SiteConfig::from_str(
            r#"
[paths]
css = ["src/assets/css/base.css"]
js = ["src/assets/js/app.js"]
"#,
        )
        .unwrap();
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(config.paths.css.len(), 1);
    }

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) = SiteConfig::parse_with_ignored(
            r#"
[paths]
js = ["app.js"]
bundle_name = "custom"

[server]
port = 8080
"#,
        )
        .unwrap();
        assert!(ignored.iter().any(|f| f.contains("bundle_name")));
        assert!(ignored.iter().any(|f| f.contains("server")));
    }

    #[test]
    fn test_root_relative() {
        let mut config = SiteConfig::default();
        config.root = PathBuf::from("/project");
        assert_eq!(
            config.root_relative("/project/src/index.html"),
            PathBuf::from("src/index.html")
        );
        // Paths outside the root pass through untouched
        assert_eq!(
            config.root_relative("/elsewhere/a.css"),
            PathBuf::from("/elsewhere/a.css")
        );
    }
}
