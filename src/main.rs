mod cli;
mod commands;
mod engine;
mod fsops;
mod paths;
mod progress;
mod resource;
mod runner;
mod schema;
mod settings;
mod signal;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    /// Desired-state file in use
    pub config_path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "sysman", &mut io::stdout());
        return Ok(());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => paths::config_file()?,
    };
    log::debug!("using config {}", config_path.display());

    let ctx = Context {
        quiet: cli.quiet,
        config_path,
    };

    match cli.command {
        Command::Apply(args) => commands::declarative::apply(&ctx, args),
        Command::Diff(args) => commands::declarative::diff(&ctx, args),
        Command::Status => commands::declarative::status(&ctx),
        Command::Validate => commands::config::validate(&ctx),
        Command::Completions { .. } => Ok(()),
    }
}
