//! Page discovery and file I/O.
//!
//! Everything that touches the disk lives here; the transforms and the
//! batch runner only see strings.

use crate::batch::{Outcome, PageInput, PageReport};
use crate::config::SiteConfig;
use crate::page::PageContext;
use crate::transform::TransformError;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
pub const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// HTML pages under the site root, sorted by path.
///
/// Only the root itself is searched unless `recursive`; the fragment
/// directory is never entered. The home page is left out unless
/// `include_home`.
pub fn discover(config: &SiteConfig, recursive: bool, include_home: bool) -> Result<Vec<PathBuf>> {
    let root = config.get_root();
    fs::read_dir(root).with_context(|| format!("cannot read site root {}", root.display()))?;

    let fragment_dir = config.fragment_dir();
    let max_depth = if recursive { usize::MAX } else { 1 };
    let home = root.join(&config.site.home);

    let pages = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != fragment_dir)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.into_path())
        .filter(|p| is_html(p))
        .filter(|p| include_home || *p != home)
        .collect();
    Ok(pages)
}

/// Explicit page arguments, taken relative to the site root.
pub fn resolve_files(config: &SiteConfig, files: &[PathBuf]) -> Vec<PathBuf> {
    let root = config.get_root();
    files.iter().map(|file| root.join(file)).collect()
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Path of `path` relative to the site root, for display and page context.
pub fn relative_to_root<'a>(config: &SiteConfig, path: &'a Path) -> &'a Path {
    path.strip_prefix(config.get_root()).unwrap_or(path)
}

/// Read every page fully.
///
/// Pages that cannot be read come back as skipped reports instead.
pub fn load_pages(config: &SiteConfig, paths: &[PathBuf]) -> (Vec<PageInput>, Vec<PageReport>) {
    let loaded: Vec<_> = paths
        .par_iter()
        .map(|path| match fs::read_to_string(path) {
            Ok(content) => {
                let context = PageContext::new(relative_to_root(config, path), &config.site.home);
                Ok(PageInput {
                    path: path.clone(),
                    context,
                    content,
                })
            }
            Err(err) => Err(PageReport::skipped(
                path.clone(),
                TransformError::Io(path.clone(), err),
            )),
        })
        .collect();

    let mut inputs = Vec::with_capacity(loaded.len());
    let mut failed = Vec::new();
    for result in loaded {
        match result {
            Ok(input) => inputs.push(input),
            Err(report) => failed.push(report),
        }
    }
    (inputs, failed)
}

/// Write changed pages back in place.
///
/// A page whose write fails is turned into a skipped report. Nothing is
/// written when `dry_run`.
pub fn write_back(reports: &mut [PageReport], dry_run: bool) {
    if dry_run {
        return;
    }
    reports.par_iter_mut().for_each(|report| {
        let Outcome::Changed(content) = &report.outcome else {
            return;
        };
        if let Err(err) = fs::write(&report.path, content) {
            report.outcome = Outcome::Skipped(TransformError::Io(report.path.clone(), err));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in ["index.html", "about.html", "contact.htm", "style.css", ".DS_Store"] {
            fs::write(root.join(file), "<main></main>").unwrap();
        }
        fs::create_dir_all(root.join("partials")).unwrap();
        fs::write(root.join("partials/header.html"), "<header></header>").unwrap();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::write(root.join("blog/post.html"), "<main></main>").unwrap();

        let mut config = SiteConfig::default();
        config.set_root(root);
        (dir, config)
    }

    fn names(config: &SiteConfig, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| relative_to_root(config, p).to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_top_level() {
        let (_dir, config) = site();
        let pages = discover(&config, false, true).unwrap();
        assert_eq!(names(&config, &pages), ["about.html", "contact.htm", "index.html"]);
    }

    #[test]
    fn test_discover_excludes_home() {
        let (_dir, config) = site();
        let pages = discover(&config, false, false).unwrap();
        assert_eq!(names(&config, &pages), ["about.html", "contact.htm"]);
    }

    #[test]
    fn test_discover_recursive_skips_fragments() {
        let (_dir, config) = site();
        let pages = discover(&config, true, true).unwrap();
        assert_eq!(
            names(&config, &pages),
            ["about.html", "blog/post.html", "contact.htm", "index.html"]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        let (dir, mut config) = site();
        config.set_root(&dir.path().join("nope"));
        assert!(discover(&config, false, true).is_err());
    }

    #[test]
    fn test_load_pages_reports_unreadable() {
        let (dir, config) = site();
        let paths = vec![dir.path().join("blog/post.html"), dir.path().join("gone.html")];
        let (inputs, failed) = load_pages(&config, &paths);

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].context.path, "blog/post.html");
        assert_eq!(inputs[0].context.depth, 1);
        assert!(matches!(
            failed[0].outcome,
            Outcome::Skipped(TransformError::Io(..))
        ));
    }

    #[test]
    fn test_write_back() {
        let (dir, _config) = site();
        let about = dir.path().join("about.html");
        let index = dir.path().join("index.html");
        let mut reports = vec![
            PageReport {
                path: about.clone(),
                outcome: Outcome::Changed("<main>new</main>".into()),
                warnings: Vec::new(),
            },
            PageReport {
                path: index.clone(),
                outcome: Outcome::Unchanged,
                warnings: Vec::new(),
            },
        ];

        write_back(&mut reports, true);
        assert_eq!(fs::read_to_string(&about).unwrap(), "<main></main>");

        write_back(&mut reports, false);
        assert_eq!(fs::read_to_string(&about).unwrap(), "<main>new</main>");
        assert_eq!(fs::read_to_string(&index).unwrap(), "<main></main>");
    }

    #[test]
    fn test_write_back_failure_becomes_skip() {
        let (dir, _config) = site();
        let mut reports = vec![PageReport {
            path: dir.path().join("missing/dir/page.html"),
            outcome: Outcome::Changed("x".into()),
            warnings: Vec::new(),
        }];
        write_back(&mut reports, false);
        assert!(matches!(reports[0].outcome, Outcome::Skipped(_)));
    }

    #[test]
    fn test_resolve_files() {
        let (dir, config) = site();
        let files = resolve_files(&config, &[PathBuf::from("about.html")]);
        assert_eq!(files, [dir.path().join("about.html")]);
    }
}
