//! `[fragments]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[fragments]` section in pagefold.toml - shared fragments and markers.
///
/// # Example
/// ```toml
/// [fragments]
/// dir = "partials"               # holds head.html, header.html, ...
/// marker = "data-include"        # <div data-include="partials/header.html">
/// loader_script = "assets/js/include-partials.js"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentsConfig {
    /// Fragment directory, relative to the site root.
    #[serde(default = "defaults::fragments::dir")]
    #[educe(Default = defaults::fragments::dir())]
    pub dir: PathBuf,

    /// Attribute naming the fragment an include marker stands for.
    #[serde(default = "defaults::fragments::marker")]
    #[educe(Default = defaults::fragments::marker())]
    pub marker: String,

    /// Client-side include loader, dropped when pages are expanded.
    #[serde(default = "defaults::fragments::loader_script")]
    #[educe(Default = defaults::fragments::loader_script())]
    pub loader_script: Option<String>,
}

impl FragmentsConfig {
    /// Marker value for fragment file `file_name`, e.g. `partials/header.html`.
    pub fn marker_path(&self, file_name: &str) -> String {
        let dir = self.dir.to_string_lossy().replace('\\', "/");
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{dir}/{file_name}")
        }
    }
}
