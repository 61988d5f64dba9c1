//! Tool Configuration
//!
//! Layered configuration of the `bootconf` tool itself: where its inputs
//! come from and how it logs. Not to be confused with the settings the
//! resolver computes.

use crate::error::ApiError;
use crate::locale::DetectedDefaults;
use crate::logging::LoggingConfig;
use crate::sources::{BootEnvironment, MemoryStore, MetaTags, PrebootConfig, SledStore, UrlParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub inputs: InputsConfig,
}

/// Where the boot environment is read from. Relative paths are resolved
/// against the workspace root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Pre-boot settings object (JSON)
    #[serde(default)]
    pub preboot: Option<PathBuf>,

    /// Page URL whose query carries `sap-ui-*` parameters
    #[serde(default)]
    pub url: Option<String>,

    /// HTML page scanned for `<meta>` tags
    #[serde(default)]
    pub html: Option<PathBuf>,

    /// Extra meta tags; they win over tags found in `html`
    #[serde(default)]
    pub meta: HashMap<String, String>,

    /// Persistent local store; an in-memory store is used when unset
    #[serde(default)]
    pub store: Option<PathBuf>,

    /// Sources are served as optimized bundles
    #[serde(default)]
    pub optimized: bool,

    /// Module loader runs in async mode
    #[serde(default = "default_true")]
    pub loader_async: bool,

    /// Overrides the language detected from the process locale
    #[serde(default)]
    pub language: Option<String>,

    /// Overrides the timezone detected from `TZ`
    #[serde(default)]
    pub timezone: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            preboot: None,
            url: None,
            html: None,
            meta: HashMap::new(),
            store: None,
            optimized: false,
            loader_async: true,
            language: None,
            timezone: None,
        }
    }
}

impl InputsConfig {
    /// Read every configured input into a boot environment.
    pub fn build_environment(&self, workspace_root: &Path) -> Result<BootEnvironment, ApiError> {
        let resolve = |path: &Path| -> PathBuf {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workspace_root.join(path)
            }
        };

        let preboot = match &self.preboot {
            Some(path) => PrebootConfig::load(&resolve(path))?,
            None => PrebootConfig::new(),
        };

        let url = match &self.url {
            Some(location) if location.contains("://") => UrlParams::from_url(location)?,
            Some(query) => UrlParams::from_query(query),
            None => UrlParams::default(),
        };

        let mut meta = match &self.html {
            Some(path) => MetaTags::from_html(&std::fs::read_to_string(resolve(path))?),
            None => MetaTags::new(),
        };
        for (name, content) in &self.meta {
            meta.insert(name.clone(), content.clone());
        }

        let mut detected = DetectedDefaults::detect();
        if let Some(language) = &self.language {
            detected = detected.with_language(language)?;
        }
        if let Some(timezone) = &self.timezone {
            detected = detected.with_timezone(timezone.clone());
        }

        let mut env = BootEnvironment::default()
            .with_preboot(preboot)
            .with_url(url)
            .with_meta(meta)
            .with_detected(detected)
            .with_optimized(self.optimized);
        env = match &self.store {
            Some(path) => env.with_storage(Arc::new(SledStore::open(resolve(path))?)),
            None => env.with_storage(Arc::new(MemoryStore::new())),
        };
        Ok(env)
    }

    /// Default on-disk location for the persistent store.
    pub fn default_store_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bootconf")
            .map(|dirs| dirs.data_dir().join("store"))
    }
}
