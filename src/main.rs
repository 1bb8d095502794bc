use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wikiharvest::config::Config;
use wikiharvest::crawler::WikiFetcher;
use wikiharvest::harvester::Harvester;
use wikiharvest::language::{LanguageGate, WhatlangDetector};
use wikiharvest::storage::{article_key, prefix_pattern, ArticleStore, MemoryStore, RedisStore};
use wikiharvest::throttle::JitterPacer;

#[derive(Parser)]
#[command(
    name = "wikiharvest",
    version,
    about = "Harvest random English Wikipedia articles into Redis as training data",
    long_about = None
)]
struct Cli {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the harvest loop
    Run {
        /// Stop after this many iterations instead of running forever
        #[arg(long)]
        max_iterations: Option<u64>,

        /// Keep articles in memory instead of writing to the store
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Print the stored text of one article
    Get {
        /// Article title, exactly as used in the key
        title: String,
    },

    /// Delete stored articles matching a key pattern
    Purge {
        /// Glob pattern (defaults to every harvested article)
        pattern: Option<String>,

        /// Confirm the deletion
        #[arg(long, default_value = "false")]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; variables may come from the real environment
    let _ = dotenvy::dotenv();

    // Dry runs never touch the store, so they may run without credentials
    let offline = matches!(cli.command, Some(Commands::Run { dry_run: true, .. }));
    let config = if offline {
        Config::load_offline(cli.config.as_deref())?
    } else {
        Config::load(cli.config.as_deref())?
    };

    let log_format = cli
        .log_format
        .as_deref()
        .unwrap_or(config.logging.format.as_str());
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wikiharvest starting");

    match cli.command.unwrap_or(Commands::Run {
        max_iterations: None,
        dry_run: false,
    }) {
        Commands::Run {
            max_iterations,
            dry_run,
        } => {
            tracing::info!(
                max_iterations = ?max_iterations,
                dry_run = %dry_run,
                "Starting run command"
            );
            if dry_run {
                harvest(&config, MemoryStore::new(), max_iterations).await?;
            } else {
                let store = RedisStore::connect(&config.store)
                    .await
                    .context("Failed to connect to store")?;
                harvest(&config, store, max_iterations).await?;
            }
        }

        Commands::Get { title } => {
            tracing::info!(title = %title, "Starting get command");
            get(&config, &title).await?;
        }

        Commands::Purge { pattern, yes } => {
            let pattern = pattern.unwrap_or_else(|| prefix_pattern(&config.store.key_prefix));
            tracing::info!(pattern = %pattern, "Starting purge command");
            purge(&config, &pattern, yes).await?;
        }
    }

    tracing::info!("wikiharvest completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("wikiharvest=debug,info"),
        Err(_) => EnvFilter::try_new(format!("wikiharvest={level},warn"))
            .with_context(|| format!("Invalid log level: {level}"))?,
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn harvest<K: ArticleStore>(
    config: &Config,
    store: K,
    max_iterations: Option<u64>,
) -> Result<()> {
    let fetcher = WikiFetcher::new(&config.source).context("Failed to create fetcher")?;
    let gate = LanguageGate::from_config(WhatlangDetector::new(), &config.language);
    let pacer = JitterPacer::from_config(&config.throttle);

    let mut harvester = Harvester::new(
        fetcher,
        gate,
        store,
        pacer,
        config.store.key_prefix.clone(),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    };

    let stats = harvester.run_until(max_iterations, shutdown).await?;

    println!(
        "Harvested {} articles ({} new, {} updated) in {} iterations",
        stats.stored(),
        stats.created,
        stats.replaced,
        stats.iterations
    );

    Ok(())
}

async fn get(config: &Config, title: &str) -> Result<()> {
    let store = RedisStore::connect(&config.store)
        .await
        .context("Failed to connect to store")?;
    let key = article_key(&config.store.key_prefix, title);

    match store.get(&key).await? {
        Some(text) => println!("{text}"),
        None => anyhow::bail!("No article stored under key: {key}"),
    }

    Ok(())
}

async fn purge(config: &Config, pattern: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        anyhow::bail!("Refusing to delete keys matching '{pattern}' without --yes");
    }

    let store = RedisStore::connect(&config.store)
        .await
        .context("Failed to connect to store")?;
    let removed = store.delete_pattern(pattern).await?;

    println!("Deleted {removed} keys matching '{pattern}'");
    Ok(())
}
