//! jobwatch CLI
//!
//! Single-shot entry point meant to be started by cron or a systemd timer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobwatch::{
    error::Result,
    models::{Config, Posting},
    notify::{LogNotifier, Notifier, TelegramNotifier},
    pipeline,
    sources::SourceRegistry,
};

/// jobwatch - announces new job postings on Telegram
#[derive(Parser, Debug)]
#[command(
    name = "jobwatch",
    version,
    about = "Checks careers pages for new job postings"
)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where found jobs are cached (default: /tmp/jobs-cern)
    #[arg(long, global = true)]
    jobs_file: Option<PathBuf>,

    /// Telegram API token
    #[arg(long = "tg-token", global = true)]
    tg_token: Option<String>,

    /// Telegram chat ID
    #[arg(long = "tg-chat-id", global = true, allow_negative_numbers = true)]
    tg_chat_id: Option<i64>,

    /// Source to check, repeatable (default: cern)
    #[arg(short, long = "source", global = true)]
    sources: Vec<String>,

    /// Log new postings instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check sources and notify new postings (default)
    Run,

    /// List available sources
    Sources,

    /// Validate configuration and build every configured source
    Validate,

    /// Show state files and known posting counts
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the effective configuration from the optional file and CLI flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };

    if let Some(path) = &cli.jobs_file {
        config.state.jobs_file = path.clone();
    }
    if let Some(token) = &cli.tg_token {
        config.telegram.token = token.clone();
    }
    if let Some(chat_id) = cli.tg_chat_id {
        config.telegram.chat_id = chat_id;
    }
    if !cli.sources.is_empty() {
        config.select_sources(&cli.sources);
    }

    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let registry = SourceRegistry::builtin();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let notifier: Box<dyn Notifier> = if cli.dry_run {
                config.validate()?;
                Box::new(LogNotifier::new(config.telegram.template.clone()))
            } else {
                config.validate_for_delivery()?;
                Box::new(TelegramNotifier::from_config(&config.telegram, &config.http)?)
            };

            let reports = pipeline::run_pipeline(&config, &registry, notifier.as_ref()).await?;
            for report in &reports {
                log::info!(
                    "{}: {} listed, {} new ({})",
                    report.source,
                    report.fetched,
                    report.new_postings.len(),
                    report.jobs_file.display()
                );
            }
        }

        Command::Sources => {
            for name in registry.names() {
                println!("{name}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;

            for entry in &config.sources {
                registry.construct(&entry.name, &config.http, &entry.options)?;
                log::info!("✓ Source '{}' OK", entry.name);
            }

            match config.telegram.validate() {
                Ok(()) => log::info!("✓ Telegram credentials present"),
                Err(e) => log::warn!("{e} (only --dry-run will work)"),
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            for entry in &config.sources {
                let path = config.jobs_file_for(entry);
                match std::fs::read_to_string(&path) {
                    Ok(content) if content.trim().is_empty() => {
                        log::info!("{}: {} (empty)", entry.name, path.display());
                    }
                    Ok(content) => {
                        let postings: Vec<Posting> = serde_json::from_str(&content)?;
                        log::info!(
                            "{}: {} ({} known postings)",
                            entry.name,
                            path.display(),
                            postings.len()
                        );
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        log::info!("{}: {} (not created yet)", entry.name, path.display());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}
