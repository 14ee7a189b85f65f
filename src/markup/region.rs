//! Named regions of a page.
//!
//! A region is the span of an element located by its start tag and the end
//! tag that balances it. The extractor only ever hands out slices of the
//! input, so whatever surrounds a region survives byte for byte.
//!
//! ```text
//! before            open_tag     body                  after
//! ─────────────────┬───────────┬─────────┬───────────┬──────────
//! <html>...<body>  │<main id=m>│ ...     │</main>    │ <footer>...
//! ```

use super::scan::{Tag, TagKind, TagScanner, find_start_tag};
use std::ops::Range;

/// Region selector: `tag` or `tag#id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'s> {
    pub tag: &'s str,
    pub id: Option<&'s str>,
}

impl<'s> Selector<'s> {
    /// Parse `main` or `main#main`.
    pub fn parse(s: &'s str) -> Self {
        match s.split_once('#') {
            Some((tag, id)) if !id.is_empty() => Self { tag, id: Some(id) },
            Some((tag, _)) => Self { tag, id: None },
            None => Self { tag: s, id: None },
        }
    }

    pub fn matches(&self, tag: &Tag<'_>) -> bool {
        tag.is_start()
            && tag.is(self.tag)
            && self
                .id
                .is_none_or(|id| tag.attr("id").and_then(|a| a.value) == Some(id))
    }
}

/// A located region, borrowing the page it was found in.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    src: &'a str,
    /// Whole element, start tag to end tag.
    outer: Range<usize>,
    /// Content between the tags.
    inner: Range<usize>,
}

impl<'a> Region<'a> {
    /// Everything before the region's start tag.
    pub fn before(&self) -> &'a str {
        &self.src[..self.outer.start]
    }

    pub fn open_tag(&self) -> &'a str {
        &self.src[self.outer.start..self.inner.start]
    }

    pub fn body(&self) -> &'a str {
        &self.src[self.inner.clone()]
    }

    /// Everything after the region's end tag.
    #[allow(dead_code)]
    pub fn after(&self) -> &'a str {
        &self.src[self.outer.end..]
    }

    /// The element as written, start tag through end tag.
    pub fn element(&self) -> &'a str {
        &self.src[self.outer.clone()]
    }

    pub fn span(&self) -> Range<usize> {
        self.outer.clone()
    }
}

/// Locate the first element matching `selector` and its balanced end tag.
///
/// Returns `None` when there is no such start tag, or when it never closes.
pub fn extract_region<'a>(markup: &'a str, selector: &Selector<'_>) -> Option<Region<'a>> {
    let mut scanner = TagScanner::new(markup);
    let open = scanner.by_ref().find(|t| selector.matches(t))?;
    element_at(markup, &open, &mut scanner)
}

/// Build the region of `open`, scanning on from just after it.
///
/// A self-closing start tag is its own element with an empty body.
pub fn element_at<'a>(
    markup: &'a str,
    open: &Tag<'_>,
    scanner: &mut TagScanner<'a>,
) -> Option<Region<'a>> {
    if open.kind == TagKind::SelfClosing {
        return Some(Region {
            src: markup,
            outer: open.range(),
            inner: open.end..open.end,
        });
    }
    let close = scanner.balanced_close(open)?;
    Some(Region {
        src: markup,
        outer: open.start..close.end,
        inner: open.end..close.start,
    })
}

/// Text of the first `<title>`, trimmed; `None` when absent or blank.
pub fn find_title(markup: &str) -> Option<&str> {
    extract_region(markup, &Selector::parse("title"))
        .map(|r| r.body().trim())
        .filter(|t| !t.is_empty())
}

/// Text of the first `<title>`, or `fallback`.
pub fn extract_title(markup: &str, fallback: &str) -> String {
    find_title(markup).unwrap_or(fallback).to_string()
}

/// The run of `<script>` elements at the end of the body.
///
/// Starts at the first script after offset `from` and ends before `</body>`
/// (or the end of the document), trailing whitespace excluded.
pub fn extract_scripts(markup: &str, from: usize) -> Option<Region<'_>> {
    let mut scanner = TagScanner::at(markup, from);
    let first = scanner.by_ref().find(|t| t.is_start() && t.is("script"))?;
    let limit = scanner
        .find(|t| t.kind == TagKind::Close && t.is("body"))
        .map_or(markup.len(), |t| t.start);
    let end = first.start + markup[first.start..limit].trim_end().len();
    Some(Region {
        src: markup,
        outer: first.start..end,
        inner: first.start..end,
    })
}

/// The start tag of `<body>`, as written.
pub fn body_open_tag(markup: &str) -> Option<&str> {
    find_start_tag(markup, "body").map(|t| t.raw)
}
