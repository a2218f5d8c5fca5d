//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve request paths against mounted page repositories
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Content directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: pagemount.toml)
    #[arg(short = 'C', long, default_value = "pagemount.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve paths to their backing resource and handler
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: LookupArgs,

        /// Print results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Check whether paths have a backing resource (exit 1 if any is missing)
    #[command(visible_alias = "e")]
    Exists {
        #[command(flatten)]
        args: LookupArgs,
    },

    /// List every resource in the content directory
    #[command(visible_alias = "l")]
    List,
}

/// Shared arguments for Resolve and Exists commands
#[derive(clap::Args, Debug, Clone)]
pub struct LookupArgs {
    /// Request paths relative to the mount (e.g. `/about`, `/blog/`)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Base path of the repository to query
    #[arg(short, long, default_value = "/")]
    pub mount: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from(["pagemount", "resolve", "/about", "/dir/", "-m", "/app", "--json"]);
        match cli.command {
            Commands::Resolve { args, json } => {
                assert_eq!(args.paths, vec!["/about", "/dir/"]);
                assert_eq!(args.mount, "/app");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_exists_defaults() {
        let cli = Cli::parse_from(["pagemount", "-v", "e", "/about"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("pagemount.toml"));
        match cli.command {
            Commands::Exists { args } => assert_eq!(args.mount, "/"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
