//! Site configuration management for `pagefold.toml`.
//!
//! The file is optional; every field has a default.
//!
//! # Sections
//!
//! | Section       | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `[site]`      | Root, home page, fallback title                |
//! | `[fragments]` | Fragment directory, marker attribute, loader   |
//! | `[regions]`   | Selectors for head, nav, main, footer          |
//! | `[links]`     | Link rewrite rule table                        |
//!
//! # Example
//!
//! ```toml
//! [site]
//! home = "index.html"
//!
//! [fragments]
//! dir = "partials"
//!
//! [regions]
//! main = "main#main"
//!
//! [links.artifact]
//! pages = { "about.html" = "services.html" }
//! ```

pub mod defaults;
mod error;
mod fragments;
mod links;
mod regions;
mod site;

pub use error::ConfigError;
pub use fragments::FragmentsConfig;
pub use links::{LinksConfig, OccurrenceRule};
pub use regions::RegionsConfig;
pub use site::SiteSection;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pagefold.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site layout
    #[serde(default)]
    pub site: SiteSection,

    /// Shared fragments and include markers
    #[serde(default)]
    pub fragments: FragmentsConfig,

    /// Region selectors
    #[serde(default)]
    pub regions: RegionsConfig,

    /// Link rewrite rules
    #[serde(default)]
    pub links: LinksConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, or defaults when the file is absent.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.site.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.site.root = Some(path.to_path_buf())
    }

    /// Absolute fragment directory.
    pub fn fragment_dir(&self) -> PathBuf {
        self.get_root().join(&self.fragments.dir)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = Self::normalize_path(&root);
        self.set_root(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        if let Some(dir) = &cli.fragments {
            self.fragments.dir = dir.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Reject settings the transforms cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.site.home.trim().is_empty() {
            bail!(ConfigError::Validation("[site.home] must not be empty".into()));
        }

        if self.fragments.marker.trim().is_empty() {
            bail!(ConfigError::Validation(
                "[fragments.marker] must not be empty".into()
            ));
        }

        for (field, selector) in self.regions.selectors() {
            let tag = selector.split('#').next().unwrap_or_default();
            if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                bail!(ConfigError::Validation(format!(
                    "[regions.{field}] `{selector}` is not a `tag` or `tag#id` selector"
                )));
            }
        }

        if let Some(prefix) = self
            .links
            .parent_prefixes
            .iter()
            .find(|p| !p.starts_with("../"))
        {
            bail!(ConfigError::Validation(format!(
                "[links.parent_prefixes] `{prefix}` must start with `../`"
            )));
        }

        for rule in &self.links.occurrence {
            if rule.targets.is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[[links.occurrence]] for `{}` needs at least one target",
                    rule.page
                )));
            }
            if rule.text.trim().is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[[links.occurrence]] for `{}` needs anchor text",
                    rule.page
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
