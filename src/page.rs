//! Where a page sits in the site.
//!
//! The transforms never look at the filesystem; they get a `PageContext`
//! telling them the page's site-relative path, how deep it is nested, and
//! whether it is the home page.

use std::path::{Component, Path};

/// Which header/footer variant a page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    /// The home page: `header-index` / `footer-index`.
    Index,
    /// Every other page: `header` / `footer`.
    Inner,
}

/// Location facts about one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Path relative to the site root, `/`-separated (e.g. `blog/post.html`).
    pub path: String,
    /// Directories between the site root and the page.
    pub depth: usize,
    pub variant: PageVariant,
}

impl PageContext {
    /// Describe the page at `relative` (relative to the site root).
    ///
    /// The page is the home page when it is `home` at the top level.
    pub fn new(relative: &Path, home: &str) -> Self {
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        let path = parts.join("/");
        let depth = parts.len().saturating_sub(1);
        let variant = if depth == 0 && path == home {
            PageVariant::Index
        } else {
            PageVariant::Inner
        };
        Self {
            path,
            depth,
            variant,
        }
    }

    /// Prefix leading from the page back to the site root (`""`, `"../"`, ...).
    pub fn up(&self) -> String {
        "../".repeat(self.depth)
    }
}
