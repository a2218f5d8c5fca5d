//! `resolve` and `exists` commands.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use super::LookupArgs;
use crate::app::AppContext;
use crate::core::PagePath;
use crate::logger::outcome;
use crate::repository::{JspxRepository, PageRepository, Resolved};

/// One row of `resolve --json` output.
#[derive(Debug, Serialize)]
struct ResolveRow<'a> {
    path: &'a str,
    repository: String,
    found: bool,
    resource: Option<&'a str>,
    handler: Option<&'a str>,
}

/// Resolve every path and print the outcome.
pub fn run_resolve(app: &Arc<AppContext>, args: &LookupArgs, json: bool) -> Result<()> {
    let (repository, paths) = lookup_target(app, args)?;
    let results: Vec<(PagePath, Resolved)> = paths
        .into_iter()
        .map(|path| {
            let resolved = repository.resolve(&path);
            (path, resolved)
        })
        .collect();

    if json {
        let rows: Vec<ResolveRow> = results
            .iter()
            .map(|(path, resolved)| ResolveRow {
                path: path.as_str(),
                repository: repository.to_string(),
                found: resolved.is_found(),
                resource: resolved.resource(),
                handler: resolved.handler().map(|h| h.label()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (path, resolved) in &results {
        match resolved {
            Resolved::Found { resource, handler } => {
                outcome(true, path.as_str(), &format!("{resource} ({handler})"));
            }
            Resolved::NotFound => outcome(false, path.as_str(), "not found"),
        }
    }
    Ok(())
}

/// Check every path; returns whether all of them exist.
pub fn run_exists(app: &Arc<AppContext>, args: &LookupArgs) -> Result<bool> {
    let (repository, paths) = lookup_target(app, args)?;

    let mut all = true;
    for path in &paths {
        let exists = repository.exists(path);
        outcome(exists, path.as_str(), "");
        all &= exists;
    }
    Ok(all)
}

/// Parse the mount and request paths, and fetch the mounted repository.
fn lookup_target(
    app: &Arc<AppContext>,
    args: &LookupArgs,
) -> Result<(Arc<JspxRepository>, Vec<PagePath>)> {
    let mount = PagePath::new(&args.mount)
        .with_context(|| format!("invalid mount path `{}`", args.mount))?;
    let paths = parse_paths(&args.paths)?;

    let repository = JspxRepository::get_instance(app, &mount);
    crate::debug!("resolve"; "using {}", repository);
    Ok((repository, paths))
}

fn parse_paths(raw: &[String]) -> Result<Vec<PagePath>> {
    raw.iter()
        .map(|p| PagePath::from_browser(p).with_context(|| format!("invalid path `{p}`")))
        .collect()
}
