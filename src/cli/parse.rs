//! CLI parse: clap types for bootconf. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// bootconf CLI - resolve bootstrap settings from layered sources
#[derive(Parser)]
#[command(name = "bootconf")]
#[command(about = "Resolve UI bootstrap settings from defaults, pre-boot config, URL and meta tags")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Input overrides; each one replaces the matching `[inputs]` entry of the
/// loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Pre-boot settings object (JSON file)
    #[arg(long, global = true)]
    pub preboot: Option<PathBuf>,

    /// Page URL or query string carrying sap-ui-* parameters
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// HTML page to scan for meta tags
    #[arg(long, global = true)]
    pub html: Option<PathBuf>,

    /// Meta tag as name=content (repeatable)
    #[arg(long = "meta", global = true, value_name = "NAME=CONTENT")]
    pub meta: Vec<String>,

    /// Persistent local store directory
    #[arg(long, global = true, conflicts_with = "persistent")]
    pub store: Option<PathBuf>,

    /// Use the persistent store in the user data directory
    #[arg(long, global = true)]
    pub persistent: bool,

    /// Language to assume instead of the process locale
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Timezone to assume instead of TZ
    #[arg(long, global = true)]
    pub timezone: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every setting and print the result
    Resolve {
        /// Output format (text, json or toml)
        #[arg(long, default_value = "text")]
        format: String,
        /// Only show settings that differ from their compiled default
        #[arg(long)]
        changed_only: bool,
    },
    /// Print the resolved value of one setting
    Get {
        /// Setting name (case-insensitive)
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Describe one setting, or list all recognized settings
    Describe {
        /// Setting name (case-insensitive)
        name: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Apply settings after initialization and print the change events
    Apply {
        /// Assignments as name=value; values are read as JSON when they parse
        #[arg(required = true, value_name = "NAME=VALUE")]
        assignments: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the compatibility version for a feature
    Compat {
        /// Feature name (omit for the global version)
        feature: Option<String>,
    },
    /// Watch the input files and print change events as they happen
    Watch {
        /// Debounce window in milliseconds
        #[arg(long, default_value = "200")]
        debounce_ms: u64,
    },
}
