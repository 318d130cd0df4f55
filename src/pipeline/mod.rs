//! Build orchestration.
//!
//! A build walks a fixed sequence of phases: clean the output root, run
//! the four transform steps in parallel, then rewrite bundle references
//! in the transformed documents. The build identifier is drawn once at
//! the start and handed to the two bundlers and the rewriter; no other
//! step sees it.

use anyhow::{Result, anyhow};
use std::{
    fs, io,
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use crate::asset::{bundle_css, bundle_js, collect_files, collect_with_ext, copy_static};
use crate::config::SiteConfig;
use crate::core::{BuildStamp, Phase};
use crate::html::{minify_tree, rewrite_tree};
use crate::logger::ProgressLine;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run a full build.
pub fn run_build(config: &SiteConfig) -> Result<()> {
    let started = Instant::now();
    let stamp = BuildStamp::now();

    let mut phase = Phase::Idle;
    while let Some(next) = phase.next() {
        phase = next;
        debug!("build"; "entering {} phase", phase.name());

        let step = match phase {
            Phase::Cleaning => clean_output(config),
            Phase::Transforming => transform(config, stamp),
            Phase::Rewriting => rewrite(config, stamp),
            Phase::Idle | Phase::Done | Phase::Failed => Ok(()),
        };

        if let Err(e) = step {
            debug!("build"; "{} -> {}", phase.name(), Phase::Failed.name());
            return Err(e.context(format!("{} phase failed", phase.name())));
        }
    }

    log!("build"; "done in {:.2?}", started.elapsed());
    Ok(())
}

/// Delete the output root. A missing output root is not an error.
pub fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = &config.paths.output;
    match fs::remove_dir_all(output) {
        Ok(()) => {
            debug!("clean"; "removed '{}'", config.root_relative(output).display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(anyhow!(e).context(format!("failed to remove '{}'", output.display())))
        }
    }
}

/// Run the four transform steps in parallel.
///
/// The first failing step wins: it trips the shared flag, logs its error,
/// and becomes the build's failure. Steps that fail afterwards are
/// collateral and stay quiet, so the user sees one root cause instead of
/// a cascade.
fn transform(config: &SiteConfig, stamp: BuildStamp) -> Result<()> {
    let html_total = collect_with_ext(&config.paths.source, "html")?.len();
    let mut static_total = 0;
    for dir in &config.paths.statics {
        static_total += collect_files(dir)?.len();
    }

    let progress = ProgressLine::new(&[("html", html_total), ("static", static_total)]);
    let failed = AtomicBool::new(false);

    let ((html_res, css_res), (js_res, static_res)) = rayon::join(
        || {
            rayon::join(
                || {
                    guarded("html", &failed, || {
                        minify_tree(config, &failed, Some(&progress)).map(|_| ())
                    })
                },
                || guarded("css", &failed, || bundle_css(config, stamp).map(|_| ())),
            )
        },
        || {
            rayon::join(
                || guarded("js", &failed, || bundle_js(config, stamp).map(|_| ())),
                || {
                    guarded("static", &failed, || {
                        copy_static(config, &failed, Some(&progress)).map(|_| ())
                    })
                },
            )
        },
    );
    progress.finish();

    html_res?;
    css_res?;
    js_res?;
    static_res?;
    Ok(())
}

/// Run one transform step under the shared failure flag.
///
/// A step that starts after the flag is tripped is skipped. The step
/// that trips the flag logs its error and reports failure; later
/// failures are collateral of the first and are swallowed.
fn guarded(name: &str, failed: &AtomicBool, step: impl FnOnce() -> Result<()>) -> Result<()> {
    if failed.load(Ordering::SeqCst) {
        return Ok(());
    }
    match step() {
        Ok(()) => Ok(()),
        Err(e) => {
            if !failed.swap(true, Ordering::SeqCst) {
                log!("error"; "{name}: {e:#}");
                Err(anyhow!("{name} step failed"))
            } else {
                Ok(())
            }
        }
    }
}

/// Point every transformed document at this build's bundles.
fn rewrite(config: &SiteConfig, stamp: BuildStamp) -> Result<()> {
    let count = rewrite_tree(config, stamp)?;
    log!("rewrite"; "updated {}", plural_count(count, "document"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Lay out a complete miniature site and its config.
    fn fixture(root: &Path) -> SiteConfig {
        let src = root.join("src");
        fs::create_dir_all(src.join("assets/css")).unwrap();
        fs::create_dir_all(src.join("assets/js")).unwrap();
        fs::create_dir_all(src.join("assets/svg")).unwrap();

        fs::write(
            src.join("index.html"),
            r#"<!DOCTYPE html>
<html>
<head>
  <title>Demo</title>
  <link rel="stylesheet" href="assets/css/base.css">
  <link rel="stylesheet" href="assets/css/theme.css">
</head>
<body>
  <h1>  Hello  </h1>
  <script src="assets/js/app.js"></script>
</body>
</html>"#,
        )
        .unwrap();

        fs::write(src.join("assets/css/base.css"), "body { margin: 0; }").unwrap();
        fs::write(src.join("assets/css/theme.css"), ".theme { color: teal; }").unwrap();
        fs::write(src.join("assets/js/app.js"), "window.app = { ready: true };").unwrap();
        fs::write(src.join("assets/svg/logo.svg"), "<svg></svg>").unwrap();

        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.paths.source = src.clone();
        config.paths.css = vec![
            src.join("assets/css/base.css"),
            src.join("assets/css/theme.css"),
        ];
        config.paths.js = vec![src.join("assets/js/app.js")];
        config.paths.statics = vec![src.join("assets/svg")];
        config.paths.output = root.join("dist");
        config
    }

    /// Name of the single file in a bundle directory.
    fn only_file(dir: &Path) -> String {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries.len(), 1, "expected exactly one bundle in {dir:?}");
        entries.pop().unwrap()
    }

    #[test]
    fn test_full_build() {
        let dir = TempDir::new().unwrap();
        let config = fixture(dir.path());

        run_build(&config).unwrap();

        let dist = &config.paths.output;
        let html = fs::read_to_string(dist.join("index.html")).unwrap();

        // Original references are gone
        assert!(!html.contains("base.css"));
        assert!(!html.contains("app.js"));

        // Inserted references point at files that exist on disk
        let css_name = only_file(&dist.join("assets/css"));
        let js_name = only_file(&dist.join("assets/js"));
        assert!(css_name.starts_with("bundle-") && css_name.ends_with(".min.css"));
        assert!(js_name.starts_with("bundle-") && js_name.ends_with(".min.js"));
        assert_eq!(html.matches(&format!("assets/css/{css_name}")).count(), 1);
        assert_eq!(html.matches(&format!("assets/js/{js_name}")).count(), 1);

        // Bundles carry the minified content
        let css = fs::read_to_string(dist.join("assets/css").join(css_name)).unwrap();
        assert!(css.contains("teal"));
        let js = fs::read_to_string(dist.join("assets/js").join(js_name)).unwrap();
        assert!(js.contains("window.app"));

        // Static assets were copied
        assert!(dist.join("assets/img/logo.svg").is_file());
    }

    #[test]
    fn test_rebuild_replaces_previous_output() {
        let dir = TempDir::new().unwrap();
        let config = fixture(dir.path());

        run_build(&config).unwrap();
        run_build(&config).unwrap();

        // Clean wiped the first run, so exactly one bundle remains and the
        // document references it exactly once
        let dist = &config.paths.output;
        let css_name = only_file(&dist.join("assets/css"));
        let html = fs::read_to_string(dist.join("index.html")).unwrap();
        assert_eq!(html.matches(&css_name).count(), 1);
        assert_eq!(html.matches("rel=stylesheet").count() + html.matches("rel=\"stylesheet\"").count(), 1);
    }

    #[test]
    fn test_missing_script_fails_build() {
        let dir = TempDir::new().unwrap();
        let mut config = fixture(dir.path());
        config.paths.js.push(dir.path().join("src/assets/js/ghost.js"));

        let err = run_build(&config).unwrap_err();
        assert!(format!("{err:#}").contains("transform phase failed"));
    }

    #[test]
    fn test_clean_tolerates_missing_output() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.root = dir.path().to_path_buf();
        config.paths.output = dir.path().join("never-built");

        clean_output(&config).unwrap();
    }

    #[test]
    fn test_clean_removes_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir_all(out.join("assets")).unwrap();
        fs::write(out.join("index.html"), "x").unwrap();

        let mut config = SiteConfig::default();
        config.root = dir.path().to_path_buf();
        config.paths.output = out.clone();

        clean_output(&config).unwrap();
        assert!(!out.exists());
    }
}
