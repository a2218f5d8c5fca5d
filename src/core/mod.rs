//! Core types - pure abstractions shared across the codebase.

mod path;

pub use path::{PagePath, PathError};
