//! Shared fragment storage.
//!
//! Fragments are read from `<dir>/<name>.html` on first use and kept for the
//! rest of the run. A fragment that cannot be read becomes a visible
//! placeholder comment instead of an error, so one missing file never stops
//! the other pages.

use crate::page::PageVariant;
use anyhow::{Result, bail};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// The fixed set of fragments a site can share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentName {
    Head,
    Header,
    HeaderIndex,
    Footer,
    FooterIndex,
    Scripts,
}

impl FragmentName {
    pub const ALL: [Self; 6] = [
        Self::Head,
        Self::Header,
        Self::HeaderIndex,
        Self::Footer,
        Self::FooterIndex,
        Self::Scripts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Header => "header",
            Self::HeaderIndex => "header-index",
            Self::Footer => "footer",
            Self::FooterIndex => "footer-index",
            Self::Scripts => "scripts",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// File name inside the fragment directory.
    pub fn file_name(self) -> String {
        format!("{}.html", self.as_str())
    }

    pub const fn kind(self) -> FragmentKind {
        match self {
            Self::Head => FragmentKind::Head,
            Self::Header | Self::HeaderIndex => FragmentKind::Header,
            Self::Footer | Self::FooterIndex => FragmentKind::Footer,
            Self::Scripts => FragmentKind::Scripts,
        }
    }
}

/// What a fragment is for, independent of the page variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Head,
    Header,
    Footer,
    Scripts,
}

impl FragmentKind {
    /// The concrete fragment a page of `variant` uses.
    pub const fn resolve(self, variant: PageVariant) -> FragmentName {
        match (self, variant) {
            (Self::Head, _) => FragmentName::Head,
            (Self::Header, PageVariant::Index) => FragmentName::HeaderIndex,
            (Self::Header, PageVariant::Inner) => FragmentName::Header,
            (Self::Footer, PageVariant::Index) => FragmentName::FooterIndex,
            (Self::Footer, PageVariant::Inner) => FragmentName::Footer,
            (Self::Scripts, _) => FragmentName::Scripts,
        }
    }

    /// Kind named by an include marker value such as `partials/header-index.html`.
    ///
    /// A leading `/` and the directory part are ignored; only the file stem
    /// matters.
    pub fn from_marker(value: &str) -> Option<Self> {
        let file = value.rsplit('/').next().unwrap_or(value);
        let stem = file.strip_suffix(".html").unwrap_or(file);
        FragmentName::from_name(stem).map(FragmentName::kind)
    }
}

/// Content handed out by the store.
#[derive(Debug, Clone)]
pub struct FragmentContent {
    pub text: Arc<str>,
    /// The fragment could not be read; `text` is a placeholder.
    pub missing: bool,
}

/// Placeholder comment standing in for fragment file `file_name`.
pub fn placeholder(file_name: &str) -> String {
    format!("<!-- {file_name} not found -->")
}

/// Read-only fragment cache for one run.
///
/// # Thread Safety
///
/// Loads may race from several pages; the `RwLock` double-check keeps the
/// first successful read, so every page sees the same content.
#[derive(Debug, Default)]
pub struct FragmentStore {
    /// `None` for in-memory stores; unknown names are then missing.
    dir: Option<PathBuf>,
    cache: RwLock<FxHashMap<FragmentName, FragmentContent>>,
}

impl FragmentStore {
    /// Store reading from `dir`, which must exist.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("fragment directory not found: {}", dir.display());
        }
        Ok(Self {
            dir: Some(dir.to_path_buf()),
            cache: RwLock::default(),
        })
    }

    /// Store holding exactly `entries`.
    pub fn in_memory<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (FragmentName, S)>,
        S: Into<String>,
    {
        let cache = entries
            .into_iter()
            .map(|(name, text)| {
                let text: String = text.into();
                let content = FragmentContent {
                    text: Arc::from(text),
                    missing: false,
                };
                (name, content)
            })
            .collect();
        Self {
            dir: None,
            cache: RwLock::new(cache),
        }
    }

    /// Store with no fragments at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `name`, reading it on first use.
    pub fn load(&self, name: FragmentName) -> FragmentContent {
        if let Some(content) = self.cache.read().get(&name) {
            return content.clone();
        }

        let mut cache = self.cache.write();
        cache
            .entry(name)
            .or_insert_with(|| self.read(name))
            .clone()
    }

    fn read(&self, name: FragmentName) -> FragmentContent {
        let file_name = name.file_name();
        let text = self
            .dir
            .as_ref()
            .and_then(|dir| fs::read_to_string(dir.join(&file_name)).ok());
        match text {
            Some(text) => FragmentContent {
                text: Arc::from(text),
                missing: false,
            },
            None => FragmentContent {
                text: Arc::from(placeholder(&file_name)),
                missing: true,
            },
        }
    }
}
