use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finterm::catalog::CatalogStore;
use finterm::client::HttpDataApi;
use finterm::commands::completions::{generate_completions, Shell};
use finterm::commands::{cache_cmd, shell};
use finterm::config::{settings_dir, AppConfig};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "finterm")]
#[command(about = "Interactive market research terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// Inspect or maintain the on-disk catalog caches
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show each cache file's freshness
    Status,
    /// Delete and re-fetch every remote catalog
    Refresh,
    /// Delete all cache files
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings_dir()?;
    let config = AppConfig::load(&settings)?;

    match cli.command {
        None | Some(Commands::Shell) => shell::run(&config, &settings),
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Status => cache_cmd::status(&settings, config.cache.age_hours),
            CacheCommands::Refresh => {
                let api = HttpDataApi::new(&config.api.base_url)?;
                let store = CatalogStore::new(
                    Box::new(api),
                    &settings,
                    config.cache.age_hours,
                    config.metric_views.clone(),
                );
                cache_cmd::refresh(&store, &settings)
            }
            CacheCommands::Clear => cache_cmd::clear(&settings),
        },
        Some(Commands::Completions { shell }) => {
            let shell = Shell::from_str(&shell)?;
            generate_completions(shell, &mut Cli::command())
        }
    }
}
