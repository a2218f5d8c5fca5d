//! Pagemount - resolve content paths to page resources.
//!
//! A [`JspxRepository`](repository::JspxRepository) mounts a resource
//! namespace at a base path of an application. The
//! [`RepositoryRegistry`](repository::RepositoryRegistry) keeps exactly one
//! repository per (application, base path), and each repository maps a
//! request path such as `/blog/post` to a backing resource and the handler
//! able to render it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pagemount::app::AppContext;
//! use pagemount::core::PagePath;
//! use pagemount::repository::{JspxRepository, PageRepository};
//! use pagemount::resource::{ExtensionDispatcher, MemoryTree};
//!
//! let app = AppContext::new(
//!     "site",
//!     Arc::new(MemoryTree::with_names(["/app/about.jspx"])),
//!     Arc::new(ExtensionDispatcher::for_extensions([".jspx"])),
//! );
//!
//! let repo = JspxRepository::get_instance(&app, &PagePath::new("/app/").unwrap());
//! let resolved = repo.resolve(&PagePath::new("/about").unwrap());
//! assert_eq!(resolved.resource(), Some("/app/about.jspx"));
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod repository;
pub mod resource;
