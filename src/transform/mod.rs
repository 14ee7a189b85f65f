//! Page transforms.
//!
//! # Modes
//!
//! ```text
//!              collapse
//!   static  ─────────────►  partials
//!   (fragments inlined) ◄─────────────  (include markers)
//!              expand
//!
//!   repair: links only, either form
//!   sync:   canonical header and footer, static form
//! ```
//!
//! Every mode works on one page's markup in memory and either returns the
//! whole new page or an error that leaves the page as it was.

mod collapse;
mod expand;
mod repair;
mod sync;

use crate::config::SiteConfig;
use crate::fragment::FragmentStore;
use crate::page::PageContext;
use std::path::PathBuf;
use thiserror::Error;

/// Transform selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Static → partials: shared regions become include markers.
    Collapse,
    /// Partials → static: include markers become fragment content.
    Expand,
    /// Link rewriting only.
    Repair,
    /// Static pages: header and footer replaced by the current fragments.
    Sync,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collapse => "collapse",
            Self::Expand => "expand",
            Self::Repair => "repair",
            Self::Sync => "sync",
        }
    }
}

/// Why a page was skipped, or what went wrong along the way.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("region `{0}` not found")]
    RegionNotFound(String),

    #[error("fragment `{0}` not found, placeholder inserted")]
    FragmentMissing(String),

    #[error("include marker `{0}` names no known fragment")]
    MalformedMarker(String),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

/// A successfully transformed page.
#[derive(Debug)]
pub struct Transformed {
    pub content: String,
    /// Problems that did not stop the transform.
    pub warnings: Vec<TransformError>,
}

impl Transformed {
    fn clean(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }
}

/// Everything a transform needs besides the page itself.
///
/// Shared by all pages of a run; holds no mutable state of its own.
pub struct Engine<'a> {
    pub config: &'a SiteConfig,
    pub fragments: &'a FragmentStore,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a SiteConfig, fragments: &'a FragmentStore) -> Self {
        Self { config, fragments }
    }

    /// Transform one page.
    pub fn transform(
        &self,
        mode: Mode,
        page: &PageContext,
        markup: &str,
    ) -> Result<Transformed, TransformError> {
        match mode {
            Mode::Collapse => collapse::collapse(markup, page, self.config),
            Mode::Expand => expand::expand(markup, page, self.config, self.fragments),
            Mode::Repair => Ok(repair::repair(markup, page, self.config)),
            Mode::Sync => sync::sync(markup, page, self.config, self.fragments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentName;
    use crate::markup::region::{Selector, extract_region, extract_scripts};
    use std::path::Path;

    const HEAD: &str = "<meta charset=\"utf-8\">\n<title>Shared</title>";
    const HEADER: &str = "<header id=\"header\"><nav><a href=\"about.html\">About</a></nav></header>";
    const HEADER_INDEX: &str = "<header id=\"header\" class=\"home\"><nav></nav></header>";
    const FOOTER: &str = "<footer id=\"footer\"><p>inner</p></footer>";
    const FOOTER_INDEX: &str = "<footer id=\"footer\"><p>home</p></footer>";
    const SCRIPTS: &str = "<script src=\"assets/js/main.js\"></script>";

    fn store() -> FragmentStore {
        FragmentStore::in_memory([
            (FragmentName::Head, HEAD),
            (FragmentName::Header, HEADER),
            (FragmentName::HeaderIndex, HEADER_INDEX),
            (FragmentName::Footer, FOOTER),
            (FragmentName::FooterIndex, FOOTER_INDEX),
            (FragmentName::Scripts, SCRIPTS),
        ])
    }

    fn page(path: &str) -> PageContext {
        PageContext::new(Path::new(path), "index.html")
    }

    const STATIC_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\">
   <head>
<meta charset=\"utf-8\">
<title>Shared</title>
</head>
   <body>
<header id=\"header\"><nav><a href=\"about.html\">About</a></nav></header>

      <main id=\"main\">
         <div class=\"container\"><div class=\"row\"><p>Body</p></div></div>
      </main>

<footer id=\"footer\"><p>inner</p></footer>
<script src=\"assets/js/main.js\"></script>
   </body>
</html>
";

    #[test]
    fn test_round_trip_collapse_then_expand() {
        let config = SiteConfig::default();
        let fragments = store();
        let engine = Engine::new(&config, &fragments);
        let page = page("about.html");

        let partial = engine.transform(Mode::Collapse, &page, STATIC_PAGE).unwrap();
        assert!(partial.content.contains("data-include=\"partials/header.html\""));

        let restored = engine
            .transform(Mode::Expand, &page, &partial.content)
            .unwrap();
        assert!(restored.warnings.is_empty());

        let main = Selector::parse("main");
        assert_eq!(
            extract_region(&restored.content, &main).unwrap().element(),
            extract_region(STATIC_PAGE, &main).unwrap().element()
        );
        for selector in ["header", "footer", "head"] {
            let selector = Selector::parse(selector);
            assert_eq!(
                extract_region(&restored.content, &selector).unwrap().body(),
                extract_region(STATIC_PAGE, &selector).unwrap().body()
            );
        }

        let footer_end = |s: &str| extract_region(s, &Selector::parse("footer")).unwrap().span().end;
        assert_eq!(
            extract_scripts(&restored.content, footer_end(&restored.content))
                .unwrap()
                .body(),
            SCRIPTS
        );
    }

    #[test]
    fn test_collapse_is_stable_after_round_trip() {
        let config = SiteConfig::default();
        let fragments = store();
        let engine = Engine::new(&config, &fragments);
        let page = page("about.html");

        let once = engine.transform(Mode::Collapse, &page, STATIC_PAGE).unwrap();
        let expanded = engine.transform(Mode::Expand, &page, &once.content).unwrap();
        let twice = engine
            .transform(Mode::Collapse, &page, &expanded.content)
            .unwrap();
        assert_eq!(once.content, twice.content);
    }

    #[test]
    fn test_sync_after_expand_changes_nothing() {
        let config = SiteConfig::default();
        let fragments = store();
        let engine = Engine::new(&config, &fragments);
        let page = page("about.html");

        let synced = engine.transform(Mode::Sync, &page, STATIC_PAGE).unwrap();
        assert!(synced.warnings.is_empty());
        assert_eq!(synced.content, STATIC_PAGE);

        let stale = STATIC_PAGE.replace("<p>inner</p>", "<p>stale</p>");
        let synced = engine.transform(Mode::Sync, &page, &stale).unwrap();
        assert_eq!(synced.content, STATIC_PAGE);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(Mode::Collapse.name(), "collapse");
        assert_eq!(Mode::Expand.name(), "expand");
        assert_eq!(Mode::Repair.name(), "repair");
        assert_eq!(Mode::Sync.name(), "sync");
    }
}
