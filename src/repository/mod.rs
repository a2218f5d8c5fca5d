//! Page repositories: one mount of a resource namespace per base path.
//!
//! # Architecture
//!
//! ```text
//! RepositoryRegistry::get_instance(app, "/app/")
//!         │  normalize: "/app/" -> "/app"
//!         ▼
//! DashMap<PagePath, Arc<JspxRepository>>   (one per AppContext)
//!         │
//!         ▼
//! JspxRepository { prefix: "/app" }
//!         │  resolve("/about")
//!         ▼
//! probe "/app/about.jspx" ──► ResourceTree ──► Dispatcher ──► Resolved
//! ```
//!
//! # Module Structure
//!
//! - [`jspx`]: [`JspxRepository`], the JSPX content format
//! - [`registry`]: [`RepositoryRegistry`], at most one repository per base path
//! - [`resolve`]: probe-name construction shared by every lookup

mod jspx;
mod registry;
mod resolve;

use std::fmt;

use crate::core::PagePath;
use crate::resource::Handler;

pub use jspx::JspxRepository;
pub use registry::RepositoryRegistry;
pub use resolve::{INCLUDE_SUFFIX, INDEX_RESOURCE, PAGE_EXTENSION, is_include, probe_name};

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// No directly navigable resource for this path.
    NotFound,

    /// A backing resource and the handler that renders it.
    Found {
        /// Probe name that matched (e.g. `/app/about.jspx`)
        resource: String,
        handler: Handler,
    },
}

impl Resolved {
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Matched resource name, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::Found { resource, .. } => Some(resource),
            Self::NotFound => None,
        }
    }

    pub fn handler(&self) -> Option<&Handler> {
        match self {
            Self::Found { handler, .. } => Some(handler),
            Self::NotFound => None,
        }
    }
}

/// A mounted content namespace.
///
/// `Display` is the repository's identity string (e.g. `jspx:/app`).
pub trait PageRepository: Send + Sync + fmt::Display {
    /// Whether the repository can currently serve pages.
    fn is_available(&self) -> bool;

    /// Whether a backing resource exists for `path`.
    fn exists(&self, path: &PagePath) -> bool;

    /// Resolve `path` to a resource and its handler.
    fn resolve(&self, path: &PagePath) -> Resolved;
}
