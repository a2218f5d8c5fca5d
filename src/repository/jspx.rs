//! JSPX pages in the application's local resource tree.

use std::fmt;
use std::sync::{Arc, Weak};

use super::resolve::{is_include, probe_name};
use super::{PageRepository, RepositoryRegistry, Resolved};
use crate::app::AppContext;
use crate::core::PagePath;
use crate::resource::{Dispatcher, ResourceTree};

/// Accesses JSPX pages mounted at one base path of an application.
///
/// Only one instance exists per application and base path; obtain it with
/// [`JspxRepository::get_instance`]. Immutable once constructed.
pub struct JspxRepository {
    app: Weak<AppContext>,
    tree: Arc<dyn ResourceTree>,
    dispatcher: Arc<dyn Dispatcher>,
    path: PagePath,
    prefix: String,
}

impl JspxRepository {
    /// Get the repository for `app` mounted at `path`.
    ///
    /// Any trailing slash on `path` is stripped, so `/app` and `/app/`
    /// yield the same instance.
    pub fn get_instance(app: &Arc<AppContext>, path: &PagePath) -> Arc<Self> {
        RepositoryRegistry::of(app).get_instance(app, path)
    }

    /// `path` must already be normalized (no trailing slash unless root).
    pub(super) fn new(app: &Arc<AppContext>, path: PagePath) -> Self {
        debug_assert!(path.is_root() || !path.is_dir());
        let prefix = if path.is_root() {
            String::new()
        } else {
            path.as_str().to_string()
        };
        Self {
            app: Arc::downgrade(app),
            tree: Arc::clone(app.tree()),
            dispatcher: Arc::clone(app.dispatcher()),
            path,
            prefix,
        }
    }

    /// Owning application, if it is still alive.
    pub fn app(&self) -> Option<Arc<AppContext>> {
        self.app.upgrade()
    }

    /// Base path, without any trailing slash except for `/`.
    pub fn path(&self) -> &PagePath {
        &self.path
    }

    /// Prefix for direct concatenation: the path itself, or empty for `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PageRepository for JspxRepository {
    fn is_available(&self) -> bool {
        true
    }

    fn exists(&self, path: &PagePath) -> bool {
        let name = probe_name(&self.prefix, path);
        self.tree.lookup(&name).is_some()
    }

    fn resolve(&self, path: &PagePath) -> Resolved {
        if is_include(path) {
            crate::debug!("resolve"; "{}: {} is include-only", self, path);
            return Resolved::NotFound;
        }

        let name = probe_name(&self.prefix, path);
        if self.tree.lookup(&name).is_none() {
            return Resolved::NotFound;
        }

        match self.dispatcher.handler(&name) {
            Some(handler) => Resolved::Found {
                resource: name,
                handler,
            },
            None => {
                crate::debug!("resolve"; "{}: no handler for existing {}", self, name);
                Resolved::NotFound
            }
        }
    }
}

impl fmt::Display for JspxRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jspx:{}", self.prefix)
    }
}

impl fmt::Debug for JspxRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JspxRepository")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
