//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use elog_core::{DutyStatus, RawEvent, RawStatus, RawTimestamp};

/// Driver daily log checker.
///
/// Reads a day of duty-status changes and reports per-status hours and
/// Hours-of-Service driving violations.
#[derive(Debug, Parser)]
#[command(name = "elog", version, about, long_about = None)]
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
    /// Print totals, the violation verdict and the day's segments.
    Report {
        #[command(flatten)]
        day: DayArgs,

        /// Output the full evaluation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Exit with status 1 if the day ends in a driving violation.
    Check {
        #[command(flatten)]
        day: DayArgs,
    },
}

/// Where the day's log comes from and how to adjust it.
#[derive(Debug, Clone, Default, Args)]
pub struct DayArgs {
    /// Log document (JSON). Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    /// Status in effect at the start of the day (1-4 or OFF/SB/D/ON).
    #[arg(long)]
    pub start_status: Option<DutyStatus>,

    /// Explicit day boundary, e.g. 2024-03-05T00:00:00-06:00.
    #[arg(long)]
    pub start_date: Option<String>,

    /// Append an event, e.g. `--add D@2024-03-05T08:00:00Z`. Repeatable.
    #[arg(long = "add", value_name = "STATUS@TIME", value_parser = parse_added_event)]
    pub added: Vec<RawEvent>,
}

/// Parses `STATUS@TIME` into a raw event; validation happens on append.
fn parse_added_event(s: &str) -> Result<RawEvent, String> {
    let Some((status, time)) = s.split_once('@') else {
        return Err(format!("expected STATUS@TIME, got {s}"));
    };
    Ok(RawEvent::new(
        RawStatus::Text(status.to_string()),
        RawTimestamp::Text(time.to_string()),
    ))
}
