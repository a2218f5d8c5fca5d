//! Probe-name construction.
//!
//! A directory-like path maps to its implicit index resource, a leaf path
//! to a same-named resource with [`PAGE_EXTENSION`] appended:
//!
//! | prefix | path     | probe name            |
//! |--------|----------|-----------------------|
//! | `""`   | `/`      | `/index.jspx`         |
//! | `""`   | `/about` | `/about.jspx`         |
//! | `/app` | `/dir/`  | `/app/dir/index.jspx` |

use crate::core::PagePath;

/// Appended to directory-like paths.
pub const INDEX_RESOURCE: &str = "index.jspx";

/// Appended to leaf paths.
pub const PAGE_EXTENSION: &str = ".jspx";

/// Include-only fragments; never directly resolvable.
pub const INCLUDE_SUFFIX: &str = ".inc";

/// Build the resource name probed for `path` under `prefix`.
pub fn probe_name(prefix: &str, path: &PagePath) -> String {
    let path = path.as_str();
    let suffix = if path.ends_with('/') {
        INDEX_RESOURCE
    } else {
        PAGE_EXTENSION
    };

    let len = prefix.len() + path.len() + suffix.len();
    let mut name = String::with_capacity(len);
    name.push_str(prefix);
    name.push_str(path);
    name.push_str(suffix);
    debug_assert_eq!(name.len(), len);
    name
}

/// Whether `path` names an include-only fragment.
#[inline]
pub fn is_include(path: &PagePath) -> bool {
    path.ends_with(INCLUDE_SUFFIX)
}
