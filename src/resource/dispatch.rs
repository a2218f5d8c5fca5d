//! Handlers and the dispatchers that hand them out.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

/// Opaque handle naming the renderer for a resource.
///
/// Clones share identity: two handlers are equal only if they come from
/// the same registration.
#[derive(Clone)]
pub struct Handler(Arc<str>);

impl Handler {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&&*self.0).finish()
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces a handler capable of rendering a resource name.
pub trait Dispatcher: Send + Sync {
    fn handler(&self, resource: &str) -> Option<Handler>;
}

impl<T: Dispatcher + ?Sized> Dispatcher for Arc<T> {
    #[inline]
    fn handler(&self, resource: &str) -> Option<Handler> {
        (**self).handler(resource)
    }
}

/// Explicit resource name -> handler registrations.
///
/// A resource may exist in the tree before (or after) its handler is
/// registered here.
#[derive(Debug, Default)]
pub struct HandlerTable {
    handlers: DashMap<String, Handler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the one it replaced.
    pub fn register(&self, resource: &str, handler: Handler) -> Option<Handler> {
        self.handlers.insert(resource.to_string(), handler)
    }

    pub fn unregister(&self, resource: &str) -> Option<Handler> {
        self.handlers.remove(resource).map(|(_, h)| h)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Dispatcher for HandlerTable {
    fn handler(&self, resource: &str) -> Option<Handler> {
        self.handlers.get(resource).map(|h| h.clone())
    }
}

/// One shared handler per file extension.
#[derive(Debug, Default)]
pub struct ExtensionDispatcher {
    by_extension: Vec<(String, Handler)>,
}

impl ExtensionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with one handler per extension, labelled by the extension.
    pub fn for_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dispatcher = Self::new();
        for ext in extensions {
            let ext = ext.as_ref();
            let label = ext.trim_start_matches('.');
            dispatcher = dispatcher.with(ext, Handler::new(label));
        }
        dispatcher
    }

    /// Add (or replace) the handler for an extension such as `.jspx`.
    pub fn with(mut self, extension: &str, handler: Handler) -> Self {
        self.by_extension.retain(|(ext, _)| ext != extension);
        self.by_extension.push((extension.to_string(), handler));
        self
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_extension.iter().map(|(ext, _)| ext.as_str())
    }
}

impl Dispatcher for ExtensionDispatcher {
    fn handler(&self, resource: &str) -> Option<Handler> {
        self.by_extension
            .iter()
            .find(|(ext, _)| resource.ends_with(ext.as_str()))
            .map(|(_, handler)| handler.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_identity() {
        let a = Handler::new("jspx");
        let b = Handler::new("jspx");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn test_handler_table_registration_gap() {
        let table = HandlerTable::new();
        assert!(table.handler("/about.jspx").is_none());

        let handler = Handler::new("about");
        assert!(table.register("/about.jspx", handler.clone()).is_none());
        assert_eq!(table.handler("/about.jspx"), Some(handler.clone()));

        assert_eq!(table.unregister("/about.jspx"), Some(handler));
        assert!(table.handler("/about.jspx").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_extension_dispatcher() {
        let dispatcher = ExtensionDispatcher::for_extensions([".jspx"]);
        let handler = dispatcher.handler("/app/about.jspx").unwrap();
        assert_eq!(handler.label(), "jspx");

        // Same shared handler for every matching resource
        assert_eq!(dispatcher.handler("/index.jspx"), Some(handler));
        assert!(dispatcher.handler("/app/about.inc").is_none());
    }

    #[test]
    fn test_extension_dispatcher_replaces() {
        let custom = Handler::new("custom");
        let dispatcher =
            ExtensionDispatcher::for_extensions([".jspx"]).with(".jspx", custom.clone());
        assert_eq!(dispatcher.extensions().count(), 1);
        assert_eq!(dispatcher.handler("/a.jspx"), Some(custom));
    }
}
