//! CLI route: single route table and run context. Dispatches to the resolver
//! and presentation.

use crate::cli::command_name;
use crate::cli::parse::{Commands, InputArgs};
use crate::cli::presentation::{
    format_descriptor_json, format_descriptor_text, format_descriptors_json,
    format_descriptors_text, format_events_json, format_events_text, format_settings_json,
    format_settings_text, format_settings_toml, format_value_json, format_value_text,
    SettingRow,
};
use crate::cli::watch::SettingsWatcher;
use crate::collab::{DefaultFormatting, DefaultLocalization, LoaderSettings};
use crate::config::{ConfigLoader, InputsConfig, ToolConfig};
use crate::error::ApiError;
use crate::notify::ChangeEvent;
use crate::resolver::SettingsResolver;
use crate::schema::{describe, descriptors, OptionDescriptor};
use crate::sources::BootEnvironment;
use crate::value::RawValue;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace root and the merged tool
/// configuration. Built from workspace path and optional config path using
/// ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ToolConfig,
}

impl RunContext {
    /// Create run context from workspace root, optional config path and the
    /// input flags given on the command line.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        inputs: &InputArgs,
    ) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        apply_input_overrides(&mut config.inputs, inputs)?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Read all inputs into a fresh boot environment.
    pub fn environment(&self) -> Result<BootEnvironment, ApiError> {
        self.config.inputs.build_environment(&self.workspace_root)
    }

    /// Fresh environment that reads every input except the store.
    pub(crate) fn environment_without_store(&self) -> Result<BootEnvironment, ApiError> {
        let inputs = InputsConfig {
            store: None,
            ..self.config.inputs.clone()
        };
        inputs.build_environment(&self.workspace_root)
    }

    /// Initialized resolver over a fresh boot environment.
    pub fn resolver(&self) -> Result<SettingsResolver, ApiError> {
        let env = self.environment()?;
        let localization =
            DefaultLocalization::new(env.detected.language.clone(), env.detected.timezone.clone());
        let mut resolver = SettingsResolver::with_collaborators(
            env,
            Box::new(localization),
            Box::new(DefaultFormatting::default()),
            Box::new(LoaderSettings::new(self.config.inputs.loader_async)),
        );
        resolver.init()?;
        Ok(resolver)
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = name, "Executing command");
        let result = self.execute_inner(command);
        debug!(
            command = name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Resolve {
                format,
                changed_only,
            } => self.handle_resolve(format, *changed_only),
            Commands::Get { name, format } => {
                let resolver = self.resolver()?;
                let value = resolver.get(name)?;
                match format.as_str() {
                    "json" => format_value_json(describe(name)?.name, &value),
                    "text" => Ok(format_value_text(&value)),
                    other => Err(invalid_format(other, &["text", "json"])),
                }
            }
            Commands::Describe { name, format } => handle_describe(name.as_deref(), format),
            Commands::Apply {
                assignments,
                format,
            } => self.handle_apply(assignments, format),
            Commands::Compat { feature } => {
                let resolver = self.resolver()?;
                Ok(resolver.compatibility_version(feature.as_deref()).to_string())
            }
            Commands::Watch { debounce_ms } => {
                let watcher = SettingsWatcher::new(self, *debounce_ms);
                watcher.run()?;
                Ok("Watch mode stopped".to_string())
            }
        }
    }

    fn handle_resolve(&self, format: &str, changed_only: bool) -> Result<String, ApiError> {
        let resolver = self.resolver()?;
        let detected = &resolver.environment().detected;
        let rows: Vec<SettingRow> = resolver
            .snapshot()
            .into_iter()
            .map(|(descriptor, value)| SettingRow::new(descriptor, value, detected))
            .filter(|row| !changed_only || !row.is_default)
            .collect();
        match format {
            "text" => Ok(format_settings_text(&rows)),
            "json" => format_settings_json(&rows),
            "toml" => format_settings_toml(&rows),
            other => Err(invalid_format(other, &["text", "json", "toml"])),
        }
    }

    fn handle_apply(&self, assignments: &[String], format: &str) -> Result<String, ApiError> {
        let parsed = assignments
            .iter()
            .map(|assignment| parse_assignment(assignment))
            .collect::<Result<Vec<_>, _>>()?;

        let mut resolver = self.resolver()?;
        let (id, events) = resolver.subscribe_channel();
        let result = resolver.apply_many(parsed);
        resolver.unsubscribe(id);
        result?;
        let events: Vec<ChangeEvent> = events.try_iter().collect();

        match format {
            "text" => Ok(format_events_text(&events)),
            "json" => format_events_json(&events),
            other => Err(invalid_format(other, &["text", "json"])),
        }
    }
}

fn handle_describe(name: Option<&str>, format: &str) -> Result<String, ApiError> {
    match name {
        Some(name) => {
            let descriptor = describe(name)?;
            match format {
                "text" => Ok(format_descriptor_text(descriptor)),
                "json" => format_descriptor_json(descriptor),
                other => Err(invalid_format(other, &["text", "json"])),
            }
        }
        None => {
            let all: Vec<&OptionDescriptor> = descriptors().collect();
            match format {
                "text" => Ok(format_descriptors_text(&all)),
                "json" => format_descriptors_json(&all),
                other => Err(invalid_format(other, &["text", "json"])),
            }
        }
    }
}

fn invalid_format(format: &str, allowed: &[&str]) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid output format: {} (must be one of {})",
        format,
        allowed.join(", ")
    ))
}

/// `name=value`; the value is read as JSON when it parses, else as a string.
pub(crate) fn parse_assignment(assignment: &str) -> Result<(String, RawValue), ApiError> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        ApiError::ConfigError(format!(
            "Invalid assignment '{}' (expected NAME=VALUE)",
            assignment
        ))
    })?;
    let raw = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => RawValue::Json(json),
        Err(_) => RawValue::from(value),
    };
    Ok((name.trim().to_string(), raw))
}

/// Command-line input flags win over the `[inputs]` section.
fn apply_input_overrides(inputs: &mut InputsConfig, args: &InputArgs) -> Result<(), ApiError> {
    if let Some(ref preboot) = args.preboot {
        inputs.preboot = Some(preboot.clone());
    }
    if let Some(ref url) = args.url {
        inputs.url = Some(url.clone());
    }
    if let Some(ref html) = args.html {
        inputs.html = Some(html.clone());
    }
    for tag in &args.meta {
        let (name, content) = tag.split_once('=').ok_or_else(|| {
            ApiError::ConfigError(format!("Invalid meta tag '{}' (expected NAME=CONTENT)", tag))
        })?;
        inputs.meta.insert(name.to_string(), content.to_string());
    }
    if let Some(ref store) = args.store {
        inputs.store = Some(store.clone());
    } else if args.persistent {
        inputs.store = Some(InputsConfig::default_store_path().ok_or_else(|| {
            ApiError::ConfigError("Cannot determine the user data directory".to_string())
        })?);
    }
    if let Some(ref language) = args.language {
        inputs.language = Some(language.clone());
    }
    if let Some(ref timezone) = args.timezone {
        inputs.timezone = Some(timezone.clone());
    }
    Ok(())
}
