//! Pagemount - resolve content paths to page resources.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use pagemount::cli::{Cli, Commands, list, lookup};
use pagemount::config::AppConfig;
use pagemount::{debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AppConfig::load(&cli)?;
    debug!("config"; "content directory: {}", config.content_dir().display());

    match &cli.command {
        Commands::List => list::run_list(&config),
        Commands::Resolve { args, json } => {
            let app = config.build_app("pagemount");
            app.start();
            let result = lookup::run_resolve(&app, args, *json);
            app.stop();
            result
        }
        Commands::Exists { args } => {
            let app = config.build_app("pagemount");
            app.start();
            let all_exist = lookup::run_exists(&app, args);
            app.stop();
            if !all_exist? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
