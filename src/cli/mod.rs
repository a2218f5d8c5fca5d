//! Command-line interface module.

mod args;
pub mod list;
pub mod lookup;

pub use args::{Cli, Commands, LookupArgs};
