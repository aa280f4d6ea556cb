//! Command-line argument definitions

use crate::config::DEFAULT_CONCURRENCY;
use clap::{Args, Parser, Subcommand};

/// Batched, cursor-paginated API fetching
#[derive(Parser, Debug)]
#[command(name = "pagewave", version, about)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// One batched round of requests, no pagination
    Lookup {
        /// URL template with a `{subject}` placeholder
        #[arg(long)]
        url: String,

        /// Subject to query, numeric id or name (repeatable)
        #[arg(long = "subject", required = true)]
        subjects: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Fetch every page for each subject
    Fetch {
        /// URL template with `{subject}` and `{cursor}` placeholders
        #[arg(long)]
        url: String,

        /// Subject to query, numeric id or name (repeatable)
        #[arg(long = "subject", required = true)]
        subjects: Vec<String>,

        /// Dotted path to the record array in each page body
        #[arg(long, default_value = "")]
        records_path: String,

        /// Field carrying the next-page cursor
        #[arg(long, default_value = "next_cursor")]
        cursor_field: String,

        /// Stop a subject after this many records
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags shared by every command
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Maximum concurrent requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Retry ceiling for transient failures (default: retry forever)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Extra header as `Name: value` (repeatable)
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// HTTP basic credentials as `user:password`
    #[arg(long)]
    pub basic: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}
