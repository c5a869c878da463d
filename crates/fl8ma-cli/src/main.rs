mod commands;
mod format;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fl8ma_api::{HttpTransport, MediaQueryClient};
use fl8ma_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fl8ma", version, about = "Anime schedules, news and community discussions")]
struct Cli {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Top of the weekly schedule and latest news, fetched together.
    Home,
    /// Currently airing titles grouped by weekday.
    Schedule {
        /// Only show one day (e.g. "mon", "friday").
        #[arg(long)]
        day: Option<chrono::Weekday>,
    },
    /// Recently updated titles.
    News,
    /// Full detail for one title.
    Detail { id: u64 },
    /// Search titles by name.
    Search { term: String },
    /// Community discussions.
    #[command(subcommand)]
    Community(CommunityCommand),
    /// Configuration helpers.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
enum CommunityCommand {
    /// List discussions, newest first.
    List,
    /// Start a discussion and show the updated board.
    Post {
        title: String,
        #[arg(long, default_value = "you")]
        author: String,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the config file path in use.
    Path,
    /// Write the effective config to `--config`, or the per-user file.
    Init,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from(p)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// File the `config` subcommands operate on.
fn config_target(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(AppConfig::config_path, Path::to_path_buf)
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &AppConfig) -> anyhow::Result<MediaQueryClient<HttpTransport>> {
    let endpoint = url::Url::parse(&config.api.endpoint)
        .with_context(|| format!("invalid API endpoint: {}", config.api.endpoint))?;
    let transport = HttpTransport::builder()
        .endpoint(endpoint)
        .timeout(config.api.timeout())
        .max_retries(config.api.max_retries)
        .retry_backoff(config.api.retry_backoff())
        .build()
        .context("failed to build HTTP transport")?;
    Ok(MediaQueryClient::new(transport))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match (&cli.command, cli.config.as_deref()) {
        // `config init` may target a file that does not exist yet.
        (Command::Config(ConfigCommand::Init), Some(p)) if !p.exists() => AppConfig::default(),
        (_, path) => load_config(path)?,
    };
    init_logging(&config);

    match cli.command {
        Command::Home => commands::home(&build_client(&config)?).await,
        Command::Schedule { day } => {
            commands::schedule(&build_client(&config)?, &config, day).await;
        }
        Command::News => commands::news(&build_client(&config)?).await,
        Command::Detail { id } => commands::detail(&build_client(&config)?, id).await,
        Command::Search { term } => commands::search(&build_client(&config)?, &term).await,
        Command::Community(CommunityCommand::List) => commands::community_list(),
        Command::Community(CommunityCommand::Post { title, author }) => {
            commands::community_post(&title, &author)?;
        }
        Command::Config(ConfigCommand::Path) => {
            println!("{}", config_target(cli.config.as_deref()).display());
        }
        Command::Config(ConfigCommand::Init) => {
            let target = config_target(cli.config.as_deref());
            config.save_to(&target)?;
            println!("wrote {}", target.display());
        }
    }

    Ok(())
}
