//! Static → partials.

use super::expand::{TITLE_ATTR, find_markers};
use super::{TransformError, Transformed};
use crate::config::SiteConfig;
use crate::fragment::{FragmentKind, FragmentName};
use crate::markup::link::{RuleSet, normalize_links};
use crate::markup::region::{
    Selector, body_open_tag, extract_region, extract_scripts, extract_title,
};
use crate::markup::newline_of;
use crate::markup::scan::TagScanner;
use crate::page::PageContext;
use std::fmt::Write;

/// Rebuild `markup` as a partials page around its `main` element.
///
/// Shared regions are dropped in favour of include markers; only the
/// prologue, the `<body>` start tag and `main` survive from the page.
pub fn collapse(
    markup: &str,
    page: &PageContext,
    config: &SiteConfig,
) -> Result<Transformed, TransformError> {
    let regions = &config.regions;
    let main = extract_region(markup, &Selector::parse(&regions.main))
        .ok_or_else(|| TransformError::RegionNotFound(regions.main.clone()))?;

    let head = extract_region(markup, &Selector::parse(&regions.head));
    let nav = extract_region(markup, &Selector::parse(&regions.nav));
    let footer = extract_region(markup, &Selector::parse(&regions.footer));
    let scripts_from = footer.as_ref().map_or(main.span().end, |f| f.span().end);
    let scripts = extract_scripts(markup, scripts_from);

    // A page that is already partials has markers where the regions were.
    let marked: Vec<FragmentKind> = find_markers(markup, &config.fragments.marker)
        .iter()
        .filter_map(|m| FragmentKind::from_marker(m.value))
        .collect();
    let mut warnings = Vec::new();
    for (found, kind, selector) in [
        (head.is_some(), FragmentKind::Head, regions.head.as_str()),
        (nav.is_some(), FragmentKind::Header, regions.nav.as_str()),
        (footer.is_some(), FragmentKind::Footer, regions.footer.as_str()),
        (scripts.is_some(), FragmentKind::Scripts, "script"),
    ] {
        if !found && !marked.contains(&kind) {
            warnings.push(TransformError::RegionNotFound(selector.to_string()));
        }
    }

    let nl = newline_of(markup);
    let title = match head.as_ref().and_then(|h| marker_title(h.open_tag())) {
        Some(title) => title.to_string(),
        None => extract_title(markup, &config.site.fallback_title),
    };
    let title = title.replace('"', "&quot;");

    let fragments = &config.fragments;
    let marker = |name: FragmentName| {
        format!(
            "<div {}=\"{}\"></div>",
            fragments.marker,
            fragments.marker_path(&name.file_name())
        )
    };
    let variant = page.variant;

    let mut out = String::with_capacity(markup.len());
    match &head {
        Some(head) => out.push_str(head.before()),
        None => {
            let _ = write!(out, "<!DOCTYPE html>{nl}<html lang=\"en\">{nl}");
        }
    }
    let _ = write!(
        out,
        "<head {}=\"{}\" {TITLE_ATTR}=\"{title}\"></head>{nl}",
        fragments.marker,
        fragments.marker_path(&FragmentName::Head.file_name()),
    );
    let _ = write!(
        out,
        "   {}{nl}      {}{nl}{nl}      {}{nl}{nl}      {}{nl}      {}{nl}   </body>{nl}</html>{nl}",
        body_open_tag(markup).unwrap_or("<body>"),
        marker(FragmentKind::Header.resolve(variant)),
        main.element(),
        marker(FragmentKind::Footer.resolve(variant)),
        marker(FragmentName::Scripts),
    );

    let content = normalize_links(&out, page, &config.links, RuleSet::PARENT_FLATTEN).into_owned();
    Ok(Transformed { content, warnings })
}

/// Title stored on an already collapsed head marker.
fn marker_title(open_tag: &str) -> Option<&str> {
    TagScanner::new(open_tag)
        .next()?
        .attr(TITLE_ATTR)?
        .value
        .filter(|t| !t.trim().is_empty())
}
