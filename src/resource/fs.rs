//! Resource tree backed by a content directory.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{ResourceRef, ResourceTree};

/// Resolves resource names to regular files under `root`.
///
/// `/app/about.jspx` maps to `<root>/app/about.jspx`. Names that are not
/// rooted or that contain `.`/`..` segments never match.
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource name to a filesystem path inside the root.
    fn file_for(&self, name: &str) -> Option<PathBuf> {
        let relative = name.strip_prefix('/')?;
        let mut path = self.root.clone();
        for segment in relative.split('/') {
            match segment {
                "" | "." | ".." => return None,
                _ => path.push(segment),
            }
        }
        Some(path)
    }

    /// Every resource name in the tree, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let path = e.path();
                let relative = path.strip_prefix(&self.root).ok()?;
                let segments: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(format!("/{}", segments.join("/")))
            })
            .collect();
        names.sort_unstable();
        names
    }
}

impl ResourceTree for FsTree {
    fn lookup(&self, name: &str) -> Option<ResourceRef> {
        let path = self.file_for(name)?;
        let meta = std::fs::metadata(&path).ok()?;
        if !meta.is_file() {
            crate::debug!("tree"; "{} is not a regular file", path.display());
            return None;
        }
        Some(ResourceRef::new(name).with_size(meta.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, FsTree) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app/dir")).unwrap();
        fs::write(dir.path().join("app/about.jspx"), "<p/>").unwrap();
        fs::write(dir.path().join("app/dir/index.jspx"), "<p>x</p>").unwrap();
        let tree = FsTree::new(dir.path());
        (dir, tree)
    }

    #[test]
    fn test_lookup_file() {
        let (_dir, tree) = fixture();
        let found = tree.lookup("/app/about.jspx").unwrap();
        assert_eq!(&*found.name, "/app/about.jspx");
        assert_eq!(found.size, Some(4));
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let (_dir, tree) = fixture();
        assert!(tree.lookup("/app/dir").is_none());
        assert!(tree.lookup("/app/missing.jspx").is_none());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let (_dir, tree) = fixture();
        assert!(tree.lookup("app/about.jspx").is_none());
        assert!(tree.lookup("/app/dir/../about.jspx").is_none());
        assert!(tree.lookup("/app//about.jspx").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let (_dir, tree) = fixture();
        assert_eq!(
            tree.names(),
            vec![
                "/app/about.jspx".to_string(),
                "/app/dir/index.jspx".to_string()
            ]
        );
    }
}
