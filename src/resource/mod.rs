//! Collaborators a repository resolves against.
//!
//! # Module Structure
//!
//! - [`tree`]: [`ResourceTree`] trait and the in-memory [`MemoryTree`]
//! - [`fs`]: [`FsTree`], a tree backed by a content directory
//! - [`cache`]: [`CachedTree`], TTL memoization over any tree
//! - [`dispatch`]: [`Handler`] and the [`Dispatcher`] implementations
//!
//! ```text
//! probe name ──► ResourceTree::lookup ──► Some(ResourceRef)
//!                                              │
//!                                              ▼
//!                             Dispatcher::handler ──► Some(Handler)
//! ```

mod cache;
mod dispatch;
mod fs;
mod tree;

pub use cache::{CachedTree, DEFAULT_MAX_ENTRIES};
pub use dispatch::{Dispatcher, ExtensionDispatcher, Handler, HandlerTable};
pub use fs::FsTree;
pub use tree::{MemoryTree, ResourceRef, ResourceTree};
