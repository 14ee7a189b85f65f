//! `[regions]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[regions]` section in pagefold.toml - selectors for page regions.
///
/// Each selector is `tag` or `tag#id`.
///
/// # Example
/// ```toml
/// [regions]
/// nav = "header#header"
/// main = "main#main"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct RegionsConfig {
    #[serde(default = "defaults::regions::head")]
    #[educe(Default = defaults::regions::head())]
    pub head: String,

    /// Site header with its navigation; replaced by the header fragment.
    #[serde(default = "defaults::regions::nav")]
    #[educe(Default = defaults::regions::nav())]
    pub nav: String,

    /// Page-specific content, kept verbatim.
    #[serde(default = "defaults::regions::main")]
    #[educe(Default = defaults::regions::main())]
    pub main: String,

    #[serde(default = "defaults::regions::footer")]
    #[educe(Default = defaults::regions::footer())]
    pub footer: String,
}

impl RegionsConfig {
    /// `(field name, selector)` pairs, for validation.
    pub fn selectors(&self) -> [(&'static str, &str); 4] {
        [
            ("head", self.head.as_str()),
            ("nav", self.nav.as_str()),
            ("main", self.main.as_str()),
            ("footer", self.footer.as_str()),
        ]
    }
}
