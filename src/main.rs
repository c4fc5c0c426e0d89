use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use hwbot::api::HomeworkClient;
use hwbot::config::{Config, ConfigError, ServiceConfig};
use hwbot::driver::{format_timestamp, poll_once, CycleOutcome, Driver, Ticker};
use hwbot::logging;
use hwbot::notify::TelegramNotifier;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

#[derive(Parser)]
#[command(name = "hwbot")]
#[command(about = "Watch homework review status and report changes to Telegram", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read credentials from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll for status changes and notify the chat until stopped
    Run {
        /// Seconds between polls (default: HWBOT_RETRY_SECS or 600)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Unix timestamp to look for changes from (default: now)
        #[arg(long)]
        from: Option<i64>,

        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Fetch and print the current status once without notifying
    Check {
        /// Unix timestamp to look for changes from (default: now)
        #[arg(long)]
        from: Option<i64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let env_file = cli.env_file.as_deref();
    let result = match cli.command {
        Commands::Run {
            interval,
            from,
            once,
        } => Config::load(env_file)
            .map_err(config_failure)
            .and_then(|config| run(config, interval, from, once)),
        Commands::Check { from } => ServiceConfig::load(env_file)
            .map_err(config_failure)
            .and_then(|config| check(config, from)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn config_failure(err: ConfigError) -> anyhow::Error {
    error!(variable = err.variable().unwrap_or("-"), "{err}");
    anyhow::Error::new(err).context("Configuration is incomplete, not starting")
}

fn run(config: Config, interval: Option<u64>, from: Option<i64>, once: bool) -> Result<()> {
    let source = HomeworkClient::new(&config.service)?;
    let notifier = TelegramNotifier::new(&config.telegram)?;
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or(config.retry_interval);

    let mut driver = Driver::new(source, notifier, from.unwrap_or_else(now));
    let (ticker, shutdown) = Ticker::new(interval);
    ctrlc::set_handler(move || shutdown.request())
        .context("Failed to install signal handler")?;

    driver.run(&ticker, once.then_some(1));
    Ok(())
}

fn check(config: ServiceConfig, from: Option<i64>) -> Result<()> {
    let source = HomeworkClient::new(&config)?;
    let from = from.unwrap_or_else(now);

    println!(
        "{} {} since {}",
        "→".blue(),
        config.endpoint.dimmed(),
        format_timestamp(from)
    );

    let outcome = poll_once(&source, from);
    match &outcome {
        CycleOutcome::Update { message, .. } => println!("{} {message}", "✓".green().bold()),
        CycleOutcome::NoUpdate { .. } => println!("{} {}", "─".dimmed(), outcome.message()),
        CycleOutcome::Failed { .. } => println!("{} {}", "✗".red().bold(), outcome.message()),
    }
    if let Some(watermark) = outcome.validated_watermark() {
        println!("  next poll from {}", format_timestamp(watermark));
    }

    Ok(())
}

fn now() -> i64 {
    Utc::now().timestamp()
}
