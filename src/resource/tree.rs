//! Resource tree abstraction and the in-memory implementation.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A resource found in a [`ResourceTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Resource name as probed (e.g. `/app/about.jspx`).
    pub name: Arc<str>,
    /// Size in bytes, when the backing store knows it.
    pub size: Option<u64>,
}

impl ResourceRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Maps resource names to existing resources.
///
/// Absence is a normal result, never an error.
pub trait ResourceTree: Send + Sync {
    fn lookup(&self, name: &str) -> Option<ResourceRef>;
}

impl<T: ResourceTree + ?Sized> ResourceTree for Arc<T> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<ResourceRef> {
        (**self).lookup(name)
    }
}

/// Thread-safe in-memory resource tree.
#[derive(Debug, Default)]
pub struct MemoryTree {
    resources: RwLock<FxHashMap<Arc<str>, ResourceRef>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree containing the given resource names.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tree = Self::new();
        for name in names {
            tree.insert(name.as_ref());
        }
        tree
    }

    /// Insert or replace a resource.
    pub fn insert(&self, name: &str) {
        let name: Arc<str> = Arc::from(name);
        self.resources
            .write()
            .insert(Arc::clone(&name), ResourceRef::new(name));
    }

    pub fn remove(&self, name: &str) -> bool {
        self.resources.write().remove(name).is_some()
    }

    pub fn clear(&self) {
        self.resources.write().clear();
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// All resource names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .resources
            .read()
            .keys()
            .map(|k| k.to_string())
            .collect();
        names.sort_unstable();
        names
    }
}

impl ResourceTree for MemoryTree {
    fn lookup(&self, name: &str) -> Option<ResourceRef> {
        self.resources.read().get(name).cloned()
    }
}
