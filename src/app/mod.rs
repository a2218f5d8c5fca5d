//! Application context: the explicit replacement for container-wide globals.
//!
//! An [`AppContext`] owns the shared collaborators (resource tree and
//! dispatcher) plus a typed attribute store. Per-application state such as
//! the repository registry lives in that store, so its lifetime is the
//! application's lifetime:
//!
//! ```text
//! AppContext::new ──► start() ──► [requests] ──► stop()
//!                        │                         │
//!                  run start hooks          drop all attributes
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::resource::{Dispatcher, ResourceTree};

type Attribute = Arc<dyn Any + Send + Sync>;
type StartHook = Arc<dyn Fn(&Arc<AppContext>) + Send + Sync>;

/// One application instance.
pub struct AppContext {
    name: String,
    tree: Arc<dyn ResourceTree>,
    dispatcher: Arc<dyn Dispatcher>,
    /// Keyed by name and type, so a lookup can never observe a value of the wrong type.
    attributes: DashMap<(&'static str, TypeId), Attribute>,
    start_hooks: Mutex<Vec<StartHook>>,
    /// Held for the whole of `start` and `stop`.
    lifecycle: Mutex<()>,
    running: AtomicBool,
}

impl AppContext {
    pub fn new(
        name: impl Into<String>,
        tree: Arc<dyn ResourceTree>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            tree,
            dispatcher,
            attributes: DashMap::new(),
            start_hooks: Mutex::new(Vec::new()),
            lifecycle: Mutex::new(()),
            running: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared resource-tree cache for this application.
    #[inline]
    pub fn tree(&self) -> &Arc<dyn ResourceTree> {
        &self.tree
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<dyn Dispatcher> {
        &self.dispatcher
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Get the attribute stored under `key`, creating it with `factory` on first use.
    ///
    /// Atomic: concurrent first calls all receive the same `Arc`, and
    /// `factory` runs at most once per key. `factory` must not touch this
    /// attribute store.
    pub fn attribute<T, F>(&self, key: &'static str, factory: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let value = Arc::clone(
            self.attributes
                .entry((key, TypeId::of::<T>()))
                .or_insert_with(|| Arc::new(factory()) as Attribute)
                .value(),
        );
        match value.downcast::<T>() {
            Ok(typed) => typed,
            Err(_) => unreachable!("attribute `{key}` is keyed by its own type"),
        }
    }

    /// Get an existing attribute without creating it.
    pub fn get_attribute<T>(&self, key: &'static str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let value = Arc::clone(self.attributes.get(&(key, TypeId::of::<T>()))?.value());
        value.downcast::<T>().ok()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Register a hook to run on every `start()`.
    pub fn on_start<F>(&self, hook: F)
    where
        F: Fn(&Arc<AppContext>) + Send + Sync + 'static,
    {
        self.start_hooks.lock().push(Arc::new(hook));
    }

    /// Start the application, running start hooks. No-op if already running.
    ///
    /// A concurrent `stop` waits until every hook has returned. Hooks must
    /// not call `start` or `stop` themselves.
    pub fn start(self: &Arc<Self>) {
        let _lifecycle = self.lifecycle.lock();
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        crate::debug!("app"; "starting {}", self.name);

        // Hooks may register more hooks; run them outside the lock.
        let hooks: Vec<StartHook> = self.start_hooks.lock().clone();
        for hook in hooks {
            hook(self);
        }
    }

    /// Stop the application, dropping all per-application state.
    pub fn stop(&self) {
        let _lifecycle = self.lifecycle.lock();
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        crate::debug!("app"; "stopping {} ({} attributes)", self.name, self.attributes.len());
        self.attributes.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("name", &self.name)
            .field("attributes", &self.attributes.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
