//! CLI argument definitions using clap derive

use crate::volumes::PathStyle;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Volman - mount and cache volume planning for job containers
///
/// Resolves mount specifications into an ordered bind list, creating
/// cache volumes on the container engine where needed.
#[derive(Parser, Debug)]
#[command(name = "volman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VOLMAN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve mounts into the bind list for a job container
    Plan(PlanArgs),

    /// Print the cache hash for a container path
    Hash(HashArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Container path syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    /// Unix paths (/builds/project)
    Unix,
    /// Windows paths (C:\builds\project)
    Windows,
}

impl From<Platform> for PathStyle {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Unix => PathStyle::Unix,
            Platform::Windows => PathStyle::Windows,
        }
    }
}

/// Output format for lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Mount specifications ([source:]destination[:mode]) in declaration order
    pub volumes: Vec<String>,

    /// Job namespace for cache names
    #[arg(short, long)]
    pub unique_name: Option<String>,

    /// Base path for relative destinations
    #[arg(short, long)]
    pub base_path: Option<String>,

    /// Host directory backing caches (instead of engine volumes)
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Reject mounts without a source
    #[arg(long)]
    pub disable_cache: bool,

    /// Scratch destinations that always get an engine volume
    #[arg(short, long = "temporary", value_name = "DESTINATION")]
    pub temporary: Vec<String>,

    /// Container path syntax
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Container engine CLI (podman or docker)
    #[arg(long)]
    pub engine: Option<String>,

    /// Report volumes instead of creating them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the hash command
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Container path to hash
    pub path: String,

    /// Job namespace; also prints the engine volume name
    #[arg(short, long)]
    pub unique_name: Option<String>,

    /// Base path for a relative path
    #[arg(short, long)]
    pub base_path: Option<String>,

    /// Container path syntax
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_plan() {
        let cli = Cli::parse_from([
            "volman",
            "plan",
            "--unique-name",
            "runner-1",
            "--base-path",
            "/builds/project",
            "-t",
            "/builds",
            "/host:/volume:ro",
            "cache",
        ]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.volumes, vec!["/host:/volume:ro", "cache"]);
                assert_eq!(args.unique_name.as_deref(), Some("runner-1"));
                assert_eq!(args.base_path.as_deref(), Some("/builds/project"));
                assert_eq!(args.temporary, vec!["/builds"]);
                assert_eq!(args.format, OutputFormat::Plain);
                assert!(!args.dry_run);
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn cli_parses_plan_platform() {
        let cli = Cli::parse_from(["volman", "plan", "--platform", "windows", "C:\\cache"]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.platform.map(PathStyle::from), Some(PathStyle::Windows));
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn cli_parses_hash() {
        let cli = Cli::parse_from(["volman", "hash", "-u", "uniq", "/volume"]);
        match cli.command {
            Commands::Hash(args) => {
                assert_eq!(args.path, "/volume");
                assert_eq!(args.unique_name.as_deref(), Some("uniq"));
            }
            _ => panic!("expected Hash command"),
        }
    }

    #[test]
    fn cli_parses_config_init_force() {
        let cli = Cli::parse_from(["volman", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force }),
            }) => assert!(force),
            _ => panic!("expected config init"),
        }
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["volman", "config"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["volman", "-v", "config"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["volman", "-vv", "config"]);
        assert_eq!(cli.verbose, 2);
    }
}
