//! `list` command.

use anyhow::{Result, bail};

use crate::config::AppConfig;
use crate::log;
use crate::resource::FsTree;

/// Print every resource name under the content directory.
pub fn run_list(config: &AppConfig) -> Result<()> {
    let content_dir = config.content_dir();
    if !content_dir.is_dir() {
        bail!("content directory `{}` does not exist", content_dir.display());
    }

    let names = FsTree::new(&content_dir).names();
    for name in &names {
        println!("{name}");
    }
    log!("list"; "{} resources in {}", names.len(), content_dir.display());
    Ok(())
}
