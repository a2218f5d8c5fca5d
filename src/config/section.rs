//! Configuration sections of `pagemount.toml`.
//!
//! # Example
//!
//! ```toml
//! [content]
//! root = "content"            # Directory backing the resource tree
//!
//! [cache]
//! ttl_ms = 1000               # Max staleness of lookups, 0 disables caching
//! max_entries = 4096          # Upper bound on memoized names
//!
//! [dispatch]
//! extensions = [".jspx"]      # Extensions that get a handler
//!
//! [mounts]
//! paths = ["/", "/blog"]      # Base paths mounted at start
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::PagePath;
use crate::repository::PAGE_EXTENSION;
use crate::resource::DEFAULT_MAX_ENTRIES;

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content directory (relative to the config file).
    pub root: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// A change on disk is visible to lookups within this many milliseconds.
    pub ttl_ms: u64,
    /// Upper bound on memoized names.
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 1000,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// `[dispatch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Resource extensions served by a handler (e.g. `.jspx`).
    pub extensions: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec![PAGE_EXTENSION.to_string()],
        }
    }
}

/// `[mounts]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountsConfig {
    /// Base paths mounted eagerly when the application starts.
    pub paths: Vec<PagePath>,
}

impl Default for MountsConfig {
    fn default() -> Self {
        Self {
            paths: vec![PagePath::root()],
        }
    }
}
