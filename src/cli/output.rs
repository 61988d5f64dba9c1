//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, ConfigError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Settings(ConfigError::UnknownOption { name, .. }) => {
            format!("Unknown setting '{}'. Run 'bootconf describe' to list settings.", name)
        }
        other => other.to_string(),
    }
}
