use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::resource::ResourceKind;

#[derive(Parser)]
#[command(name = "sysman")]
#[command(version)]
#[command(about = "Declarative manager for user daemons, flatpaks and AppImages", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/sysman/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Make installed resources match the config
    Apply(ApplyArgs),

    /// Preview what apply would change
    Diff(DiffArgs),

    /// Show installed and configured resources
    Status,

    /// Check the config file and show resolved settings
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Dry run - show what would be done
    #[arg(short, long)]
    pub dry_run: bool,

    /// Number of parallel jobs (default: config or CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Only reconcile one resource kind
    #[arg(long, value_enum)]
    pub only: Option<ResourceKind>,

    /// Print the outcome report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Only diff one resource kind
    #[arg(long, value_enum)]
    pub only: Option<ResourceKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::parse_from([
            "sysman", "-vv", "apply", "--dry-run", "-j", "3", "--only", "appimage", "--json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Apply(args) = cli.command else {
            panic!("expected apply");
        };
        assert!(args.dry_run);
        assert!(!args.yes);
        assert_eq!(args.jobs, Some(3));
        assert_eq!(args.only, Some(ResourceKind::AppImage));
        assert!(args.json);
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["sysman", "status", "--config", "/tmp/sysman.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sysman.toml")));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["sysman", "diff", "--only", "snap"]).is_err());
    }
}
