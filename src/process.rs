//! Run orchestration.
//!
//! ```text
//! process_site()
//!     │
//!     ├── discover() / resolve_files()  ──► page paths
//!     ├── load_pages()                  ──► contents (unreadable → skipped)
//!     ├── batch::run()                  ──► reports, in parallel
//!     ├── write_back()                  ──► changed pages replaced
//!     └── one log line per page + summary
//! ```

use crate::{
    batch::{self, Outcome, PageReport, Summary},
    cli::Cli,
    config::SiteConfig,
    fragment::FragmentStore,
    log,
    logger::ProgressBar,
    site,
    transform::{Engine, Mode},
};
use anyhow::{Result, bail};
use std::error::Error;

/// Transform the pages selected on the command line.
///
/// Per-page failures are reported and counted; only setup problems
/// (unreadable root, missing fragment directory in expand or sync mode)
/// are errors.
pub fn process_site(cli: &Cli, config: &SiteConfig) -> Result<Summary> {
    let mode = cli.mode();
    let args = cli.run_args();
    let root = config.get_root();
    if !root.is_dir() {
        bail!("site root not found: {}", root.display());
    }

    if config.config_path.exists() {
        log!("config"; "using {}", config.config_path.display());
    }

    let fragments = match mode {
        Mode::Expand | Mode::Sync => FragmentStore::open(&config.fragment_dir())?,
        Mode::Collapse | Mode::Repair => FragmentStore::empty(),
    };

    let paths = if args.files.is_empty() {
        site::discover(config, args.recursive, cli.include_home())?
    } else {
        site::resolve_files(config, &args.files)
    };
    log!(mode.name(); "{} pages in {}", paths.len(), root.display());

    let (inputs, mut reports) = site::load_pages(config, &paths);
    let engine = Engine::new(config, &fragments);
    let progress = ProgressBar::new_filtered(mode.name(), inputs.len());
    reports.extend(batch::run(inputs, mode, &engine, |_| {
        if let Some(progress) = &progress {
            progress.inc();
        }
    }));
    if let Some(progress) = &progress {
        progress.finish();
    }

    site::write_back(&mut reports, args.dry_run);
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    for report in &reports {
        log_report(mode, config, report, args.dry_run);
    }

    let summary = Summary::from_reports(&reports);
    log!(
        mode.name();
        "{} processed, {} {}, {} unchanged, {} skipped",
        summary.processed,
        summary.changed,
        if args.dry_run { "would change" } else { "changed" },
        summary.unchanged,
        summary.skipped
    );
    Ok(summary)
}

fn log_report(mode: Mode, config: &SiteConfig, report: &PageReport, dry_run: bool) {
    let path = site::relative_to_root(config, &report.path).display();
    match &report.outcome {
        Outcome::Changed(_) if dry_run => log!(mode.name(); "{path}: would change"),
        Outcome::Changed(_) => log!(mode.name(); "{path}: changed"),
        Outcome::Unchanged => log!(mode.name(); "{path}: unchanged"),
        Outcome::Skipped(err) => log!("skip"; "{path}: {}", describe(err)),
    }
    for warning in &report.warnings {
        log!("warn"; "{path}: {}", describe(warning));
    }
}

/// Error message followed by its sources.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformError;
    use clap::Parser;
    use std::{fs, io, path::PathBuf};
    use tempfile::TempDir;

    const STATIC_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head>
<title>About</title>
</head>
<body>
<header id=\"header\"><a href=\"/pages/index.html\">Home</a></header>
<main id=\"main\"><p>About</p></main>
<footer id=\"footer\"></footer>
<script src=\"assets/js/main.js\"></script>
</body>
</html>
";

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), STATIC_PAGE).unwrap();
        fs::write(dir.path().join("about.html"), STATIC_PAGE).unwrap();
        fs::write(dir.path().join("broken.html"), "<p>no main</p>").unwrap();
        dir
    }

    fn process(root: &std::path::Path, args: &[&str]) -> Result<Summary> {
        let root = root.to_str().unwrap();
        let cli = Cli::parse_from(["pagefold", "--root", root].iter().chain(args));
        let config = SiteConfig::load(&cli)?;
        process_site(&cli, &config)
    }

    #[test]
    fn test_collapse_site() {
        let dir = site();
        let summary = process(dir.path(), &["collapse"]).unwrap();
        assert_eq!(
            summary,
            Summary {
                processed: 2,
                changed: 1,
                unchanged: 0,
                skipped: 1
            }
        );

        let about = fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert!(about.contains("data-include=\"partials/header.html\""));
        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            STATIC_PAGE
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("broken.html")).unwrap(),
            "<p>no main</p>"
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = site();
        let summary = process(dir.path(), &["repair", "--dry-run"]).unwrap();
        assert_eq!(summary.changed, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("about.html")).unwrap(),
            STATIC_PAGE
        );
    }

    #[test]
    fn test_expand_requires_fragment_dir() {
        let dir = site();
        assert!(process(dir.path(), &["expand"]).is_err());
    }

    #[test]
    fn test_collapse_then_expand_site() {
        let dir = site();
        let partials = dir.path().join("partials");
        fs::create_dir_all(&partials).unwrap();
        fs::write(partials.join("head.html"), "<title>About</title>").unwrap();
        fs::write(partials.join("header.html"), "<header>inner</header>").unwrap();
        fs::write(partials.join("footer.html"), "<footer>inner</footer>").unwrap();
        fs::write(partials.join("scripts.html"), "<script src=\"assets/js/main.js\"></script>").unwrap();

        process(dir.path(), &["collapse", "about.html"]).unwrap();
        let summary = process(dir.path(), &["expand", "about.html"]).unwrap();
        assert_eq!(summary.changed, 1);
        assert!(summary.skipped == 0);

        let about = fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert!(about.contains("<header>inner</header>"));
        assert!(about.contains("<main id=\"main\"><p>About</p></main>"));
        assert!(!about.contains("data-include"));
    }

    #[test]
    fn test_sync_listed_pages() {
        let dir = site();
        let partials = dir.path().join("partials");
        fs::create_dir_all(&partials).unwrap();
        fs::write(partials.join("header.html"), "<header id=\"header\">canonical</header>\n").unwrap();
        fs::write(partials.join("footer.html"), "<footer id=\"footer\">canonical</footer>\n").unwrap();

        let summary = process(dir.path(), &["sync", "about.html", "missing.html"]).unwrap();
        assert_eq!(
            summary,
            Summary {
                processed: 2,
                changed: 1,
                unchanged: 0,
                skipped: 1
            }
        );

        let about = fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert_eq!(
            about,
            STATIC_PAGE
                .replace(
                    "<header id=\"header\"><a href=\"/pages/index.html\">Home</a></header>",
                    "<header id=\"header\">canonical</header>"
                )
                .replace(
                    "<footer id=\"footer\"></footer>",
                    "<footer id=\"footer\">canonical</footer>"
                )
        );
        assert!(!dir.path().join("missing.html").exists());
    }

    #[test]
    fn test_sync_requires_fragment_dir() {
        let dir = site();
        assert!(process(dir.path(), &["sync"]).is_err());
    }

    #[test]
    fn test_describe_includes_source() {
        let err = TransformError::Io(
            PathBuf::from("a.html"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(describe(&err), "IO error on `a.html`: denied");
    }
}
