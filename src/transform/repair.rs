//! Link repair on pages of either form.

use super::Transformed;
use crate::config::SiteConfig;
use crate::markup::link::{RuleSet, normalize_links};
use crate::page::PageContext;

pub fn repair(markup: &str, page: &PageContext, config: &SiteConfig) -> Transformed {
    Transformed::clean(normalize_links(markup, page, &config.links, RuleSet::REPAIR).into_owned())
}
