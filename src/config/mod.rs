//! Application configuration from `pagemount.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [content], [cache], [dispatch], [mounts]
//! ├── error      # ConfigError
//! ├── util       # config file discovery
//! └── mod.rs     # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                      |
//! |--------------|----------------------------------------------|
//! | `[content]`  | Directory backing the resource tree          |
//! | `[cache]`    | Staleness bound of resource-tree lookups     |
//! | `[dispatch]` | Extensions that receive a handler            |
//! | `[mounts]`   | Base paths mounted at application start      |

mod error;
mod section;
mod util;

pub use error::ConfigError;
pub use section::{CacheConfig, ContentConfig, DispatchConfig, MountsConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;
use crate::cli::Cli;
use crate::log;
use crate::repository::RepositoryRegistry;
use crate::resource::{CachedTree, ExtensionDispatcher, FsTree};
use util::find_config_file;

/// Root configuration structure representing pagemount.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub mounts: MountsConfig,
}

impl AppConfig {
    /// Load configuration for the CLI.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults
    /// apply and the working directory is the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        if let Some(content) = &cli.content {
            config.content.root = content.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "ignoring unknown fields in {}: {}", path.display(), ignored.join(", "));
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Check values serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.max_entries must be at least 1".into(),
            ));
        }
        if self.dispatch.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "dispatch.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self.dispatch.extensions.iter().find(|e| !is_extension(e)) {
            return Err(ConfigError::Validation(format!(
                "dispatch.extensions: `{ext}` must start with '.' and contain no '/'"
            )));
        }
        Ok(())
    }

    /// Absolute content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.content.root)
    }

    /// Build an application over the content directory.
    ///
    /// The configured mounts are created when the application starts.
    pub fn build_app(&self, name: &str) -> Arc<AppContext> {
        let tree = CachedTree::new(FsTree::new(self.content_dir()), self.cache.ttl())
            .with_max_entries(self.cache.max_entries);
        let dispatcher = ExtensionDispatcher::for_extensions(&self.dispatch.extensions);

        let app = AppContext::new(name, Arc::new(tree), Arc::new(dispatcher));
        RepositoryRegistry::install(&app, self.mounts.paths.clone());
        app
    }
}

fn is_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.') && !ext.contains('/')
}

/// Parse a config snippet, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
