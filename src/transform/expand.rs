//! Partials → static.

use super::{TransformError, Transformed};
use crate::config::SiteConfig;
use crate::fragment::{FragmentKind, FragmentStore, placeholder};
use crate::markup::region::{element_at, find_title};
use crate::markup::scan::{Tag, TagScanner};
use crate::markup::{Edit, newline_of, splice, whole_line};
use crate::page::PageContext;
use std::ops::Range;

/// Attribute carrying the page title on a collapsed head marker.
pub(super) const TITLE_ATTR: &str = "data-title";

/// An include marker element.
pub(super) struct Marker<'a> {
    pub tag: Tag<'a>,
    /// The whole element; just the start tag when it never closes.
    pub span: Range<usize>,
    /// Fragment reference, e.g. `partials/header.html`.
    pub value: &'a str,
}

/// Every include marker carrying `attr`, outermost first.
///
/// Markers nested inside another marker belong to the outer one and are
/// not reported.
pub(super) fn find_markers<'a>(markup: &'a str, attr: &str) -> Vec<Marker<'a>> {
    let mut markers = Vec::new();
    let mut scanner = TagScanner::new(markup);
    while let Some(tag) = scanner.next() {
        if !tag.is_start() {
            continue;
        }
        let Some(value) = tag.attr(attr).and_then(|a| a.value) else {
            continue;
        };

        let mut rest = scanner.clone();
        let span = match element_at(markup, &tag, &mut rest) {
            Some(region) => {
                scanner = rest;
                region.span()
            }
            None => tag.range(),
        };
        markers.push(Marker { tag, span, value });
    }
    markers
}

/// Replace each include marker of `markup` with its fragment.
///
/// Fragments are spliced in as they are; markers inside them stay
/// unresolved.
pub fn expand(
    markup: &str,
    page: &PageContext,
    config: &SiteConfig,
    fragments: &FragmentStore,
) -> Result<Transformed, TransformError> {
    let markers = find_markers(markup, &config.fragments.marker);
    if markers.is_empty() {
        return Err(TransformError::RegionNotFound(format!(
            "[{}] include marker",
            config.fragments.marker
        )));
    }

    let nl = newline_of(markup);
    let mut edits: Vec<Edit> = Vec::with_capacity(markers.len() + 1);
    let mut warnings = Vec::new();

    for marker in &markers {
        let Some(kind) = FragmentKind::from_marker(marker.value) else {
            warnings.push(TransformError::MalformedMarker(marker.value.to_string()));
            edits.push((marker.span.clone(), placeholder(marker.value)));
            continue;
        };

        let name = kind.resolve(page.variant);
        let fragment = fragments.load(name);
        if fragment.missing {
            warnings.push(TransformError::FragmentMissing(name.file_name()));
        }

        let replacement = if kind == FragmentKind::Head && marker.tag.is("head") {
            let title = marker
                .tag
                .attr(TITLE_ATTR)
                .and_then(|a| a.value)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&config.site.fallback_title);
            head_element(&fragment.text, title, nl)
        } else {
            fragment.text.to_string()
        };
        edits.push((marker.span.clone(), replacement));
    }

    if let Some(loader) = config.fragments.loader_script.as_deref() {
        for span in loader_scripts(markup, loader) {
            if !markers.iter().any(|m| m.span.contains(&span.start)) {
                edits.push((whole_line(markup, span), String::new()));
            }
        }
    }

    edits.sort_by_key(|(range, _)| range.start);
    Ok(Transformed {
        content: splice(markup, &edits).into_owned(),
        warnings,
    })
}

/// `<head>` element wrapping the head fragment, with a title if it lacks one.
fn head_element(fragment: &str, title: &str, nl: &str) -> String {
    if find_title(fragment).is_some() {
        format!("<head>{nl}{fragment}{nl}</head>")
    } else {
        format!("<head>{nl}{fragment}{nl}<title>{title}</title>{nl}</head>")
    }
}

/// Spans of `<script src="loader">...</script>` elements.
fn loader_scripts(markup: &str, loader: &str) -> Vec<Range<usize>> {
    let loader = loader.trim_start_matches('/');
    let mut spans = Vec::new();
    let mut scanner = TagScanner::new(markup);
    while let Some(tag) = scanner.next() {
        let is_loader = tag.is_start()
            && tag.is("script")
            && tag
                .attr("src")
                .and_then(|a| a.value)
                .is_some_and(|src| src.trim_start_matches('/') == loader);
        if !is_loader {
            continue;
        }
        let mut rest = scanner.clone();
        if let Some(region) = element_at(markup, &tag, &mut rest) {
            scanner = rest;
            spans.push(region.span());
        }
    }
    spans
}
