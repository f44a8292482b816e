//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use wt_core::LabelSource;

/// Window time accounting.
///
/// Reads a window focus log, splits it into categorized intervals and
/// reports how long was spent in each category, overall and per day.
#[derive(Debug, Parser)]
#[command(name = "wt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print intervals followed by overall and per-day totals.
    Report {
        /// Activity log to read (overrides `log_path` from config).
        #[arg(long)]
        log: Option<PathBuf>,

        /// Only report intervals starting at or after this instant (RFC 3339).
        #[arg(long, value_parser = parse_since)]
        since: Option<DateTime<FixedOffset>>,

        /// Label intervals by the `closing` event (default) or the `opening` one.
        #[arg(long, value_parser = parse_label_source)]
        label_by: Option<LabelSource>,

        /// Output a single JSON document instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the category of every event in the log.
    Classify {
        /// Activity log to read (overrides `log_path` from config).
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

/// Parses a `--since` value. Accepts the same timestamp layouts as the log.
pub fn parse_since(s: &str) -> Result<DateTime<FixedOffset>, String> {
    wt_core::parse_time(s).ok_or_else(|| {
        format!("invalid timestamp: {s}. Use RFC 3339 with an offset (e.g., 2017-02-06T00:00:00+02:00)")
    })
}

/// Parses a `--label-by` value.
pub fn parse_label_source(s: &str) -> Result<LabelSource, String> {
    match s {
        "closing" => Ok(LabelSource::Closing),
        "opening" => Ok(LabelSource::Opening),
        _ => Err(format!("invalid label source: {s}. Use 'closing' or 'opening'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_report_flags() {
        let cli = Cli::try_parse_from([
            "wt",
            "-v",
            "report",
            "--log",
            "/tmp/log.txt",
            "--since",
            "2017-02-06T00:00:00+02:00",
            "--label-by",
            "opening",
            "--json",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Some(Commands::Report {
            log,
            since,
            label_by,
            json,
        }) = cli.command
        else {
            panic!("expected report command");
        };
        assert_eq!(log, Some(PathBuf::from("/tmp/log.txt")));
        assert_eq!(since.unwrap().offset().local_minus_utc(), 7200);
        assert_eq!(label_by, Some(LabelSource::Opening));
        assert!(json);
    }

    #[test]
    fn rejects_bad_since() {
        let result = Cli::try_parse_from(["wt", "report", "--since", "yesterday"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_label_source() {
        assert!(parse_label_source("middle").is_err());
        assert_eq!(parse_label_source("closing"), Ok(LabelSource::Closing));
    }
}
