//! Per-application repository registry.
//!
//! Guarantees at most one [`JspxRepository`] per (application, base path),
//! including under concurrent first access. The registry itself is an
//! [`AppContext`] attribute, so it is created on first demand (or by the
//! start hook from [`RepositoryRegistry::install`]) and dropped on stop.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use super::JspxRepository;
use crate::app::AppContext;
use crate::core::PagePath;

/// Attribute key of the registry inside an [`AppContext`].
const INSTANCES_KEY: &str = "pagemount.repository.jspx.instances";

/// Base path -> repository mapping for one application.
#[derive(Debug, Default)]
pub struct RepositoryRegistry {
    instances: DashMap<PagePath, Arc<JspxRepository>>,
    /// Number of repositories ever constructed.
    constructed: AtomicUsize,
}

impl RepositoryRegistry {
    fn new() -> Self {
        Self::default()
    }

    /// The registry of `app`, created atomically on first use.
    pub fn of(app: &AppContext) -> Arc<Self> {
        app.attribute(INSTANCES_KEY, Self::new)
    }

    /// Eagerly create the registry and mount `mounts` whenever `app` starts.
    pub fn install(app: &AppContext, mounts: Vec<PagePath>) {
        app.on_start(move |app| {
            let registry = Self::of(app);
            for path in &mounts {
                let repository = registry.get_instance(app, path);
                crate::debug!("registry"; "mounted {} at {}", repository, repository.path());
            }
        });
    }

    /// Get or create the repository mounted at `path`.
    ///
    /// One trailing slash is stripped (except for `/`) before the lookup.
    /// Construction happens inside the map entry, which locks only the
    /// key's shard, so exactly one repository is built per base path.
    pub fn get_instance(&self, app: &Arc<AppContext>, path: &PagePath) -> Arc<JspxRepository> {
        let key = path.without_trailing_slash();

        if let Some(existing) = self.instances.get(&key) {
            return Arc::clone(existing.value());
        }

        let mut created = false;
        let repository = Arc::clone(
            self.instances
                .entry(key.clone())
                .or_insert_with(|| {
                    created = true;
                    Arc::new(JspxRepository::new(app, key))
                })
                .value(),
        );

        if created {
            self.constructed.fetch_add(1, Ordering::Relaxed);
            crate::debug!("registry"; "created {}", repository);
        }
        repository
    }

    /// Existing repository for `path`, without creating one.
    pub fn get(&self, path: &PagePath) -> Option<Arc<JspxRepository>> {
        let key = path.without_trailing_slash();
        self.instances.get(&key).map(|r| Arc::clone(r.value()))
    }

    /// Mounted base paths, sorted.
    pub fn mounts(&self) -> Vec<PagePath> {
        let mut mounts: Vec<_> = self.instances.iter().map(|e| e.key().clone()).collect();
        mounts.sort_unstable();
        mounts
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of repositories ever constructed by this registry.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::PageRepository;
    use crate::resource::{ExtensionDispatcher, MemoryTree};
    use std::sync::Barrier;

    fn p(s: &str) -> PagePath {
        PagePath::new(s).unwrap()
    }

    fn app() -> Arc<AppContext> {
        AppContext::new(
            "test",
            Arc::new(MemoryTree::with_names(["/app/about.jspx"])),
            Arc::new(ExtensionDispatcher::for_extensions([".jspx"])),
        )
    }

    #[test]
    fn test_same_instance_for_same_path() {
        let app = app();
        let a = JspxRepository::get_instance(&app, &p("/app"));
        let b = JspxRepository::get_instance(&app, &p("/app"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(RepositoryRegistry::of(&app).constructed(), 1);
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let app = app();
        let a = JspxRepository::get_instance(&app, &p("/app"));
        let b = JspxRepository::get_instance(&app, &p("/app/"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.prefix(), "/app");
    }

    #[test]
    fn test_root_is_stable() {
        let app = app();
        let a = JspxRepository::get_instance(&app, &PagePath::root());
        let b = JspxRepository::get_instance(&app, &PagePath::root());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.path(), &PagePath::root());
        assert_eq!(a.prefix(), "");
    }

    #[test]
    fn test_distinct_paths_distinct_instances() {
        let app = app();
        let a = JspxRepository::get_instance(&app, &p("/app"));
        let b = JspxRepository::get_instance(&app, &p("/blog"));
        assert!(!Arc::ptr_eq(&a, &b));

        let registry = RepositoryRegistry::of(&app);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.mounts(), vec![p("/app"), p("/blog")]);
    }

    #[test]
    fn test_registries_are_per_application() {
        let first = app();
        let second = app();
        let a = JspxRepository::get_instance(&first, &p("/app"));
        let b = JspxRepository::get_instance(&second, &p("/app"));
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(b.app().is_some_and(|app| Arc::ptr_eq(&app, &second)));
    }

    #[test]
    fn test_concurrent_first_access() {
        const THREADS: usize = 32;

        let app = app();
        let barrier = Barrier::new(THREADS);
        let (app, barrier) = (&app, &barrier);

        let repos: Vec<Arc<JspxRepository>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    s.spawn(move || {
                        // Half the callers use the un-normalized form
                        let path = if i % 2 == 0 { p("/app") } else { p("/app/") };
                        barrier.wait();
                        JspxRepository::get_instance(app, &path)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(repos.iter().all(|r| Arc::ptr_eq(r, &repos[0])));

        let registry = RepositoryRegistry::of(app);
        assert_eq!(registry.constructed(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_does_not_create() {
        let app = app();
        let registry = RepositoryRegistry::of(&app);
        assert!(registry.get(&p("/app")).is_none());
        assert!(registry.is_empty());

        let repo = registry.get_instance(&app, &p("/app/"));
        assert!(registry.get(&p("/app")).is_some_and(|r| Arc::ptr_eq(&r, &repo)));
    }

    #[test]
    fn test_install_mounts_on_start() {
        let app = app();
        RepositoryRegistry::install(&app, vec![PagePath::root(), p("/app/")]);
        assert!(app.get_attribute::<RepositoryRegistry>(INSTANCES_KEY).is_none());

        app.start();
        let registry = RepositoryRegistry::of(&app);
        assert_eq!(registry.mounts(), vec![PagePath::root(), p("/app")]);

        let repo = registry.get(&p("/app")).unwrap();
        assert!(repo.exists(&p("/about")));
    }

    #[test]
    fn test_stop_disposes_registry() {
        let app = app();
        RepositoryRegistry::install(&app, vec![p("/app")]);
        app.start();
        let before = JspxRepository::get_instance(&app, &p("/app"));

        app.stop();
        assert!(app.get_attribute::<RepositoryRegistry>(INSTANCES_KEY).is_none());

        app.start();
        let after = JspxRepository::get_instance(&app, &p("/app"));
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
