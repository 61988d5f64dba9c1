//! Loading facade over the `config` crate layers.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::ToolConfig;
use config::{Environment, File};
use std::path::{Path, PathBuf};

/// Loads `ToolConfig` from defaults, config files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `bootconf.toml`, `BOOTCONF_*` environment variables (`__` separates
    /// nested keys, e.g. `BOOTCONF_INPUTS__URL`).
    pub fn load(workspace_root: &Path) -> Result<ToolConfig, config::ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(environment());
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file (plus environment overrides).
    pub fn load_from_file(path: &Path) -> Result<ToolConfig, config::ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }

    pub fn default() -> ToolConfig {
        ToolConfig::default()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BOOTCONF")
        .prefix_separator("_")
        .separator("__")
}
