//! Byte-level tag scanner.
//!
//! Walks a document tag by tag without building a tree. Comments, doctype
//! and processing instructions are skipped, and the content of raw-text
//! elements (`script`, `style`, `textarea`, `title`) is never reported as
//! tags, so a `</div>` inside a script string cannot unbalance a region.
//!
//! Every offset handed out points at an ASCII delimiter, so slicing the
//! source `&str` with it is always on a char boundary.

use memchr::memchr;
use std::ops::Range;

/// Elements whose content is opaque text up to the matching end tag.
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title"];

#[inline]
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
pub fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT.iter().any(|raw| name.eq_ignore_ascii_case(raw))
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name ... />`
    SelfClosing,
}

/// One tag as it appears in the source.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    /// Offset of `<` in the source.
    pub start: usize,
    /// Offset just past `>` in the source.
    pub end: usize,
    /// Tag name exactly as written.
    pub name: &'a str,
    pub kind: TagKind,
    /// The whole `<...>` text.
    pub raw: &'a str,
}

impl<'a> Tag<'a> {
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        matches!(self.kind, TagKind::Open | TagKind::SelfClosing)
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Attributes of a start tag, in source order.
    pub fn attrs(&self) -> Attrs<'a> {
        let skip = 1 + self.name.len();
        Attrs {
            raw: self.raw,
            base: self.start,
            pos: if self.kind == TagKind::Close { self.raw.len() } else { skip },
        }
    }

    /// Value of the first attribute named `name` (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<Attr<'a>> {
        self.attrs().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Whether a whitespace-separated `class` token equals `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .and_then(|a| a.value)
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }
}

/// One attribute of a start tag.
#[derive(Debug, Clone)]
pub struct Attr<'a> {
    pub name: &'a str,
    /// Value without its quotes; `None` for bare attributes.
    pub value: Option<&'a str>,
    /// Source range of the value (quotes excluded).
    pub value_range: Range<usize>,
}

/// Iterator over the attributes inside a tag.
pub struct Attrs<'a> {
    raw: &'a str,
    base: usize,
    pos: usize,
}

impl<'a> Iterator for Attrs<'a> {
    type Item = Attr<'a>;

    fn next(&mut self) -> Option<Attr<'a>> {
        let s = self.raw.as_bytes();
        let n = s.len();
        let mut i = self.pos;

        loop {
            while i < n && (is_ws(s[i]) || s[i] == b'/') {
                i += 1;
            }
            if i >= n || s[i] == b'>' {
                self.pos = n;
                return None;
            }
            if is_name_char(s[i]) {
                break;
            }
            // stray byte, step over it
            i += 1;
        }

        let name_start = i;
        while i < n && is_name_char(s[i]) {
            i += 1;
        }
        let name = &self.raw[name_start..i];

        let mut j = i;
        while j < n && is_ws(s[j]) {
            j += 1;
        }
        if j >= n || s[j] != b'=' {
            self.pos = i;
            return Some(Attr {
                name,
                value: None,
                value_range: self.base + i..self.base + i,
            });
        }
        j += 1;
        while j < n && is_ws(s[j]) {
            j += 1;
        }

        let (value_start, value_end, next) = match s.get(j) {
            Some(&q @ (b'"' | b'\'')) => {
                let close = memchr(q, &s[j + 1..]).map_or(n, |off| j + 1 + off);
                (j + 1, close, (close + 1).min(n))
            }
            _ => {
                let mut k = j;
                while k < n && !is_ws(s[k]) && s[k] != b'>' {
                    k += 1;
                }
                (j, k, k)
            }
        };
        self.pos = next;
        Some(Attr {
            name,
            value: Some(&self.raw[value_start..value_end]),
            value_range: self.base + value_start..self.base + value_end,
        })
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// Iterator over the tags of a document, starting at a given offset.
#[derive(Clone)]
pub struct TagScanner<'a> {
    src: &'a str,
    pos: usize,
    /// Pending raw-text element whose content must be skipped.
    raw: Option<&'a str>,
}

impl<'a> TagScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::at(src, 0)
    }

    pub fn at(src: &'a str, pos: usize) -> Self {
        Self { src, pos, raw: None }
    }

    /// Scan forward to the end tag that balances `open`.
    ///
    /// Only tags named like `open` move the depth counter, so an inner
    /// element of the same name closes before the outer one does.
    pub fn balanced_close(&mut self, open: &Tag<'_>) -> Option<Tag<'a>> {
        if open.kind == TagKind::SelfClosing {
            return None;
        }
        let mut depth = 1usize;
        for tag in self.by_ref() {
            if !tag.is(open.name) {
                continue;
            }
            match tag.kind {
                TagKind::Open => depth += 1,
                TagKind::Close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(tag);
                    }
                }
                TagKind::SelfClosing => {}
            }
        }
        None
    }

    /// Skip the body of a raw-text element, leaving `pos` at its end tag.
    fn skip_raw_text(&mut self, name: &str) {
        let s = self.src.as_bytes();
        let mut i = self.pos;
        while let Some(off) = memchr(b'<', &s[i..]) {
            let lt = i + off;
            let after = lt + 2;
            if s.get(lt + 1) == Some(&b'/')
                && s.len() >= after + name.len()
                && s[after..after + name.len()].eq_ignore_ascii_case(name.as_bytes())
                && s.get(after + name.len()).is_none_or(|&b| !is_name_char(b))
            {
                self.pos = lt;
                return;
            }
            i = lt + 1;
        }
        self.pos = s.len();
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        if let Some(name) = self.raw.take() {
            self.skip_raw_text(name);
        }

        let s = self.src.as_bytes();
        let n = s.len();

        loop {
            let lt = self.pos + memchr(b'<', s.get(self.pos..)?)?;
            let rest = &s[lt..];

            if rest.starts_with(b"<!--") {
                self.pos = find(s, b"-->", lt + 4).map_or(n, |p| p + 3);
                continue;
            }
            if rest.starts_with(b"<!") || rest.starts_with(b"<?") {
                self.pos = memchr(b'>', &s[lt..]).map_or(n, |p| lt + p + 1);
                continue;
            }

            let is_close = rest.get(1) == Some(&b'/');
            let name_start = lt + 1 + usize::from(is_close);
            if !s.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
                // literal '<' in text
                self.pos = lt + 1;
                continue;
            }

            let Some(gt) = find_tag_end(s, lt) else {
                self.pos = n;
                return None;
            };
            let mut name_end = name_start;
            while name_end < n && is_name_char(s[name_end]) {
                name_end += 1;
            }

            let end = gt + 1;
            let raw = &self.src[lt..end];
            let kind = if is_close {
                TagKind::Close
            } else if raw[..raw.len() - 1].trim_end().ends_with('/') {
                TagKind::SelfClosing
            } else {
                TagKind::Open
            };
            let name = &self.src[name_start..name_end];

            self.pos = end;
            if kind == TagKind::Open && is_raw_text(name) {
                self.raw = Some(name);
            }
            return Some(Tag {
                start: lt,
                end,
                name,
                kind,
                raw,
            });
        }
    }
}

/// Find the `>` closing the tag that opens at `lt`, skipping quoted values.
///
/// A quote only opens a value right after `=`; stray quotes and apostrophes
/// inside unquoted values are plain bytes.
fn find_tag_end(s: &[u8], lt: usize) -> Option<usize> {
    let mut after_eq = false;
    let mut i = lt + 1;
    while i < s.len() {
        match s[i] {
            b'>' => return Some(i),
            b'=' => after_eq = true,
            q @ (b'"' | b'\'') if after_eq => {
                i += 1 + memchr(q, &s[i + 1..])?;
                after_eq = false;
            }
            b if is_ws(b) => {}
            _ => after_eq = false,
        }
        i += 1;
    }
    None
}

/// Find `needle` in `s` at or after `from`.
pub fn find(s: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let first = *needle.first()?;
    let mut i = from;
    while let Some(off) = memchr(first, s.get(i..)?) {
        let at = i + off;
        if s[at..].starts_with(needle) {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

/// First start tag named `name`.
pub fn find_start_tag<'a>(src: &'a str, name: &str) -> Option<Tag<'a>> {
    TagScanner::new(src).find(|t| t.is_start() && t.is(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(src: &str) -> Vec<String> {
        TagScanner::new(src)
            .map(|t| match t.kind {
                TagKind::Open => t.name.to_string(),
                TagKind::Close => format!("/{}", t.name),
                TagKind::SelfClosing => format!("{}/", t.name),
            })
            .collect()
    }

    #[test]
    fn test_scan_simple_document() {
        let src = "<!DOCTYPE html><html><body><p>hi<br/></p></body></html>";
        assert_eq!(
            names(src),
            ["html", "body", "p", "br/", "/p", "/body", "/html"]
        );
    }

    #[test]
    fn test_scan_skips_comments() {
        let src = "<div><!-- <div> --></div>";
        assert_eq!(names(src), ["div", "/div"]);
    }

    #[test]
    fn test_scan_skips_raw_text_content() {
        let src = "<script>if (a < b) { x = '</div>'; }</script><div></div>";
        assert_eq!(names(src), ["script", "/script", "div", "/div"]);
    }

    #[test]
    fn test_scan_raw_text_end_tag_case_insensitive() {
        let src = "<SCRIPT>var s = 1;</Script><p></p>";
        assert_eq!(names(src), ["SCRIPT", "/Script", "p", "/p"]);
    }

    #[test]
    fn test_scan_quoted_gt_in_attribute() {
        let src = r#"<a title="a > b" href="x.html">x</a>"#;
        let tag = TagScanner::new(src).next().unwrap();
        assert_eq!(tag.raw, r#"<a title="a > b" href="x.html">"#);
        assert_eq!(tag.attr("href").unwrap().value, Some("x.html"));
    }

    #[test]
    fn test_scan_stray_quote_in_tag() {
        let src = r#"<div class="x"">hi</div><p title='a > b'>ok</p>"#;
        assert_eq!(names(src), ["div", "/div", "p", "/p"]);
        let div = TagScanner::new(src).next().unwrap();
        assert_eq!(div.raw, r#"<div class="x"">"#);
        assert_eq!(div.attr("class").unwrap().value, Some("x"));
    }

    #[test]
    fn test_scan_apostrophe_in_unquoted_value() {
        let src = "<img alt=Founder's src=a.png><p>x</p><p title='z'>";
        let img = TagScanner::new(src).next().unwrap();
        assert_eq!(img.raw, "<img alt=Founder's src=a.png>");
        assert_eq!(img.attr("src").unwrap().value, Some("a.png"));
        assert_eq!(names(src), ["img", "p", "/p", "p"]);
    }

    #[test]
    fn test_scan_literal_lt_in_text() {
        let src = "<p>1 < 2</p>";
        assert_eq!(names(src), ["p", "/p"]);
    }

    #[test]
    fn test_attrs_quoting_styles() {
        let src = r#"<input type=email name='mail' required data-x = "y">"#;
        let tag = TagScanner::new(src).next().unwrap();
        let attrs: Vec<_> = tag.attrs().map(|a| (a.name, a.value)).collect();
        assert_eq!(
            attrs,
            [
                ("type", Some("email")),
                ("name", Some("mail")),
                ("required", None),
                ("data-x", Some("y")),
            ]
        );
    }

    #[test]
    fn test_attr_value_range_points_into_source() {
        let src = r#"<p>x</p><a class="btn" href="/about.html">About</a>"#;
        let tag = TagScanner::new(src).find(|t| t.is("a")).unwrap();
        let href = tag.attr("HREF").unwrap();
        assert_eq!(&src[href.value_range], "/about.html");
        assert!(tag.has_class("btn"));
        assert!(!tag.has_class("bt"));
    }

    #[test]
    fn test_balanced_close_nested() {
        let src = "<div><div><div></div></div></div><div></div>";
        let mut scanner = TagScanner::new(src);
        let open = scanner.next().unwrap();
        let close = scanner.balanced_close(&open).unwrap();
        assert_eq!(close.end, "<div><div><div></div></div></div>".len());
    }

    #[test]
    fn test_balanced_close_unterminated() {
        let src = "<div><div></div>";
        let mut scanner = TagScanner::new(src);
        let open = scanner.next().unwrap();
        assert!(scanner.balanced_close(&open).is_none());
    }

    #[test]
    fn test_find_start_tag() {
        let src = "<html><body class=\"home\"></body></html>";
        let body = find_start_tag(src, "BODY").unwrap();
        assert_eq!(body.raw, "<body class=\"home\">");
    }

    #[test]
    fn test_find_needle() {
        assert_eq!(find(b"abc-->x", b"-->", 0), Some(3));
        assert_eq!(find(b"abc", b"-->", 0), None);
    }
}
