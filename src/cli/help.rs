//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "resolve", "watch").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Resolve { .. } => "resolve",
        Commands::Get { .. } => "get",
        Commands::Describe { .. } => "describe",
        Commands::Apply { .. } => "apply",
        Commands::Compat { .. } => "compat",
        Commands::Watch { .. } => "watch",
    }
}
