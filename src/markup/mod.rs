//! Markup processing without a document tree.
//!
//! - `scan`: tag and attribute scanning
//! - `region`: depth-balanced region extraction
//! - `link`: `href`/`src`/`action` rewriting

pub mod link;
pub mod region;
pub mod scan;

use std::borrow::Cow;
use std::ops::Range;

/// A replacement of one source range.
pub type Edit = (Range<usize>, String);

/// Apply non-overlapping edits to `src`.
///
/// Edits must be sorted by start offset. Bytes outside the edited ranges
/// are copied unchanged.
pub fn splice<'a>(src: &'a str, edits: &[Edit]) -> Cow<'a, str> {
    if edits.is_empty() {
        return Cow::Borrowed(src);
    }

    let extra: usize = edits.iter().map(|(_, text)| text.len()).sum();
    let mut out = String::with_capacity(src.len() + extra);
    let mut cursor = 0;
    for (range, text) in edits {
        debug_assert!(range.start >= cursor, "overlapping edits");
        out.push_str(&src[cursor..range.start]);
        out.push_str(text);
        cursor = range.end;
    }
    out.push_str(&src[cursor..]);
    Cow::Owned(out)
}

/// Line ending used by a document: CRLF if it has any, LF otherwise.
pub fn newline_of(src: &str) -> &'static str {
    if src.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Widen `range` to whole lines when it is alone on its line(s).
///
/// Leading spaces/tabs back to the previous newline and one trailing line
/// break are included; otherwise `range` is returned unchanged.
pub fn whole_line(src: &str, range: Range<usize>) -> Range<usize> {
    let s = src.as_bytes();
    let mut start = range.start;
    while start > 0 && matches!(s[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > 0 && s[start - 1] != b'\n' {
        return range;
    }

    let mut end = range.end;
    while end < s.len() && matches!(s[end], b' ' | b'\t') {
        end += 1;
    }
    let end = if s[end..].starts_with(b"\r\n") {
        end + 2
    } else if s[end..].starts_with(b"\n") {
        end + 1
    } else if end == s.len() {
        end
    } else {
        return range;
    };
    start..end
}
