//! Canonical header and footer on static pages.
//!
//! The `nav` and `footer` regions are swapped for the current fragments in
//! place; every other byte of the page is kept.

use super::{TransformError, Transformed};
use crate::config::SiteConfig;
use crate::fragment::{FragmentKind, FragmentStore};
use crate::markup::region::{Selector, extract_region};
use crate::markup::{Edit, splice};
use crate::page::PageContext;

pub fn sync(
    markup: &str,
    page: &PageContext,
    config: &SiteConfig,
    fragments: &FragmentStore,
) -> Result<Transformed, TransformError> {
    let regions = &config.regions;
    let mut edits: Vec<Edit> = Vec::with_capacity(2);
    let mut warnings = Vec::new();
    let mut found = 0;

    for (kind, selector) in [
        (FragmentKind::Header, regions.nav.as_str()),
        (FragmentKind::Footer, regions.footer.as_str()),
    ] {
        let Some(region) = extract_region(markup, &Selector::parse(selector)) else {
            warnings.push(TransformError::RegionNotFound(selector.to_string()));
            continue;
        };
        found += 1;

        let name = kind.resolve(page.variant);
        let fragment = fragments.load(name);
        if fragment.missing {
            // keep the page's own region rather than a placeholder
            warnings.push(TransformError::FragmentMissing(name.file_name()));
            continue;
        }
        let canonical = fragment.text.trim();
        if region.element() != canonical {
            edits.push((region.span(), canonical.to_string()));
        }
    }

    if found == 0 {
        return Err(TransformError::RegionNotFound(format!(
            "{} or {}",
            regions.nav, regions.footer
        )));
    }

    edits.sort_by_key(|(range, _)| range.start);
    Ok(Transformed {
        content: splice(markup, &edits).into_owned(),
        warnings,
    })
}
