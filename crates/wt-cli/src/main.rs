use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wt_cli::commands::{classify, report};
use wt_cli::{Cli, Commands, Config};
use wt_core::{Classifier, EventReader};

/// Load config and build the classifier it describes.
fn load(config_path: Option<&Path>) -> Result<(Config, Classifier)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let classifier = Classifier::with_builtin_rules(config.chat_aliases.clone());
    Ok((config, classifier))
}

/// Open the activity log, preferring an explicit `--log` over config.
fn open_log(config: &Config, log: Option<&PathBuf>) -> Result<EventReader<std::io::BufReader<std::fs::File>>> {
    let path = log.unwrap_or(&config.log_path);
    tracing::debug!(path = %path.display(), "reading activity log");
    EventReader::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so report output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut out = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Report {
            log,
            since,
            label_by,
            json,
        }) => {
            let (config, classifier) = load(cli.config.as_deref())?;
            let events = open_log(&config, log.as_ref())?;
            let options = report::ReportOptions {
                since: *since,
                label_source: label_by.unwrap_or(config.label_by),
                json: *json,
            };
            report::run(&mut out, events, &classifier, options)?;
        }
        Some(Commands::Classify { log }) => {
            let (config, classifier) = load(cli.config.as_deref())?;
            let events = open_log(&config, log.as_ref())?;
            classify::run(&mut out, events, &classifier)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
