//! `[site]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[site]` section in pagefold.toml - where the pages live.
///
/// # Example
/// ```toml
/// [site]
/// home = "index.html"
/// fallback_title = "N. Betharia & Associates"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::site::root")]
    #[educe(Default = defaults::site::root())]
    pub root: Option<PathBuf>,

    /// Home page file name; gets the `-index` header/footer variants.
    #[serde(default = "defaults::site::home")]
    #[educe(Default = defaults::site::home())]
    pub home: String,

    /// Title used when neither the page nor the head fragment has one.
    #[serde(default = "defaults::site::fallback_title")]
    #[educe(Default = defaults::site::fallback_title())]
    pub fallback_title: String,
}
