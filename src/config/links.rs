//! `[links]` section configuration.
//!
//! The page-specific parts of link repair live here as data: which value
//! counts as a corrupted rewrite and where it should point on each page, and
//! which anchors get explicit targets by position.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[links]` section in pagefold.toml - link rewrite rule table.
///
/// # Example
/// ```toml
/// [links]
/// legacy_prefix = "/pages/"
/// root_dirs = ["forms/", "assets/"]
/// parent_prefixes = ["../assets/", "../forms/", "../index.html"]
///
/// [links.artifact]
/// pattern = '\1.html'
/// fallback = "index.html"
/// pages = { "about.html" = "services.html" }
///
/// [[links.occurrence]]
/// page = "services.html"
/// text = "Learn More"
/// targets = ["#audit", "direct-tax.html", "accounting.html"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Old directory prefix stripped from links (`/pages/about.html` → `about.html`).
    #[serde(default = "defaults::links::legacy_prefix")]
    #[educe(Default = defaults::links::legacy_prefix())]
    pub legacy_prefix: String,

    /// Directories whose absolute-root paths become page-relative.
    #[serde(default = "defaults::links::root_dirs")]
    #[educe(Default = defaults::links::root_dirs())]
    pub root_dirs: Vec<String>,

    /// Parent-relative prefixes flattened on top-level pages.
    #[serde(default = "defaults::links::parent_prefixes")]
    #[educe(Default = defaults::links::parent_prefixes())]
    pub parent_prefixes: Vec<String>,

    /// Repair of a known corrupted link value.
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Positional anchor targets.
    #[serde(default)]
    pub occurrence: Vec<OccurrenceRule>,
}

impl LinksConfig {
    /// Occurrence rules that apply to the page at `path`.
    pub fn occurrences_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a OccurrenceRule> {
        self.occurrence.iter().filter(move |rule| rule.page == path)
    }
}

/// `[links.artifact]` - an unresolved backreference left by an earlier
/// broken rewrite, and the targets it should have had.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Exact link value to repair. Empty disables the rule.
    #[serde(default = "defaults::links::artifact::pattern")]
    #[educe(Default = defaults::links::artifact::pattern())]
    pub pattern: String,

    /// Target used on pages without an entry in `pages`.
    #[serde(default = "defaults::links::artifact::fallback")]
    #[educe(Default = defaults::links::artifact::fallback())]
    pub fallback: String,

    /// Per-page targets, keyed by page path relative to the site root.
    #[serde(default)]
    pub pages: BTreeMap<String, String>,
}

impl ArtifactConfig {
    pub fn target_for(&self, page: &str) -> &str {
        self.pages.get(page).unwrap_or(&self.fallback)
    }
}

/// `[[links.occurrence]]` - the n-th anchor with `text` on `page` links to
/// the n-th entry of `targets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OccurrenceRule {
    /// Page path relative to the site root.
    pub page: String,
    /// Anchor text, compared after trimming.
    pub text: String,
    /// Class the anchor must also carry.
    #[serde(default)]
    pub class: Option<String>,
    pub targets: Vec<String>,
}
