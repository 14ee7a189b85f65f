//! Link normalization for `href`, `src` and `action` values.
//!
//! # Rule Table
//!
//! Applied in this order to every link value, so an earlier rewrite is
//! never picked up again by a later rule:
//!
//! | # | Rule | Example (depth 0) |
//! |---|------|-------------------|
//! | 1 | absolute root | `/about.html` → `about.html` |
//! | 2 | legacy prefix | `/pages/services.html#audit` → `services.html#audit` |
//! | 3 | artifact repair | `\1.html` → `index.html` |
//! | 4 | parent flatten | `../assets/img/a.png` → `assets/img/a.png` |
//! | 5 | occurrence | 2nd "Learn More" link → `direct-tax.html` |
//!
//! Rules 1–4 look at one value at a time and are idempotent. Rule 5 is
//! positional: the n-th matching anchor of a page gets the n-th target.
//! Only attribute values inside start tags are touched; text, comments and
//! script bodies pass through unchanged.

use super::Edit;
use super::region::element_at;
use super::scan::{Tag, TagScanner};
use super::splice;
use crate::config::{LinksConfig, OccurrenceRule};
use crate::page::PageContext;
use std::borrow::Cow;
use std::ops::BitOr;

/// Attributes holding link-like values.
const LINK_ATTRS: &[&str] = &["href", "src", "action"];

/// A selection of rules from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet(u8);

impl RuleSet {
    pub const ABSOLUTE_ROOT: Self = Self(1);
    pub const LEGACY_PREFIX: Self = Self(1 << 1);
    pub const ARTIFACT: Self = Self(1 << 2);
    pub const PARENT_FLATTEN: Self = Self(1 << 3);
    pub const OCCURRENCE: Self = Self(1 << 4);

    /// Rules 1–3 and 5.
    pub const REPAIR: Self = Self(0b1_0111);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for RuleSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Rewrite the link values of `markup` for the page described by `page`.
pub fn normalize_links<'a>(
    markup: &'a str,
    page: &PageContext,
    links: &LinksConfig,
    rules: RuleSet,
) -> Cow<'a, str> {
    let mut occurrences: Vec<Occurrence<'_>> = if rules.contains(RuleSet::OCCURRENCE) {
        links
            .occurrences_for(&page.path)
            .map(|rule| Occurrence { rule, seen: 0 })
            .collect()
    } else {
        Vec::new()
    };

    let mut edits: Vec<Edit> = Vec::new();
    let mut scanner = TagScanner::new(markup);
    while let Some(tag) = scanner.next() {
        if !tag.is_start() {
            continue;
        }
        for attr in tag.attrs() {
            if !LINK_ATTRS.iter().any(|name| attr.name.eq_ignore_ascii_case(name)) {
                continue;
            }
            let Some(value) = attr.value else { continue };

            let target = if attr.name.eq_ignore_ascii_case("href") && tag.is("a") {
                positional_target(markup, &tag, &scanner, &mut occurrences)
            } else {
                None
            };
            let rewritten = match target {
                Some(target) => (target != value).then(|| target.to_string()),
                None => rewrite_value(value, page, links, rules),
            };
            if let Some(new_value) = rewritten {
                edits.push((attr.value_range.clone(), new_value));
            }
        }
    }

    splice(markup, &edits)
}

/// Running count of one occurrence rule.
struct Occurrence<'r> {
    rule: &'r OccurrenceRule,
    seen: usize,
}

/// Target for an anchor by its position among anchors with the rule's text.
fn positional_target<'m, 'r>(
    markup: &'m str,
    tag: &Tag<'_>,
    scanner: &TagScanner<'m>,
    occurrences: &mut [Occurrence<'r>],
) -> Option<&'r str> {
    if occurrences.is_empty() {
        return None;
    }
    let anchor = element_at(markup, tag, &mut scanner.clone())?;
    let text = anchor.body().trim();

    let occurrence = occurrences.iter_mut().find(|o| {
        o.rule.text == text && o.rule.class.as_deref().is_none_or(|c| tag.has_class(c))
    })?;
    let index = occurrence.seen;
    occurrence.seen += 1;
    occurrence.rule.targets.get(index).map(String::as_str)
}

/// Apply rules 1–4 to a single value; `None` when nothing changes.
pub fn rewrite_value(
    value: &str,
    page: &PageContext,
    links: &LinksConfig,
    rules: RuleSet,
) -> Option<String> {
    let mut current = Cow::Borrowed(value);

    if rules.contains(RuleSet::ABSOLUTE_ROOT)
        && let Some(path) = absolute_root(&current, links)
    {
        current = Cow::Owned(format!("{}{path}", page.up()));
    }

    if rules.contains(RuleSet::LEGACY_PREFIX)
        && !links.legacy_prefix.is_empty()
        && let Some(rest) = current
            .strip_prefix(links.legacy_prefix.as_str())
            .map(|rest| rest.trim_start_matches('/'))
        && !rest.is_empty()
        && !rest.starts_with(['#', '?'])
    {
        current = Cow::Owned(format!("{}{rest}", page.up()));
    }

    if rules.contains(RuleSet::ARTIFACT)
        && !links.artifact.pattern.is_empty()
        && current.as_ref() == links.artifact.pattern.as_str()
    {
        current = Cow::Owned(links.artifact.target_for(&page.path).to_string());
    }

    if rules.contains(RuleSet::PARENT_FLATTEN)
        && page.depth == 0
        && links
            .parent_prefixes
            .iter()
            .any(|prefix| current.starts_with(prefix.as_str()))
    {
        let flat = current.strip_prefix("../").unwrap_or(current.as_ref()).to_string();
        current = Cow::Owned(flat);
    }

    match current {
        Cow::Borrowed(_) => None,
        Cow::Owned(new) => (new != value).then_some(new),
    }
}

/// The part after the leading `/` of an absolute-root page or directory path.
///
/// Protocol-relative values and values under the legacy prefix don't count.
fn absolute_root<'v>(value: &'v str, links: &LinksConfig) -> Option<&'v str> {
    if value.starts_with("//")
        || (!links.legacy_prefix.is_empty() && value.starts_with(links.legacy_prefix.as_str()))
    {
        return None;
    }
    let path = value.strip_prefix('/')?;
    let file = path.split(['#', '?']).next().unwrap_or_default();

    let is_page = file.ends_with(".html");
    let in_root_dir = links
        .root_dirs
        .iter()
        .any(|dir| !dir.is_empty() && path.starts_with(dir.as_str()));
    (is_page || in_root_dir).then_some(path)
}
