//! Source Readers
//!
//! Each source answers `read(descriptor)` with raw, uncoerced data or absence.
//! The resolver decides precedence; sources only know how to look things up.

use crate::locale::DetectedDefaults;
use crate::schema::OptionDescriptor;
use crate::value::RawValue;
use std::sync::Arc;

pub mod meta_tags;
pub mod preboot;
pub mod storage;
pub mod url_params;

pub use meta_tags::MetaTags;
pub use preboot::PrebootConfig;
pub use storage::{DisabledStore, KeyValueStore, MemoryStore, SledStore};
pub use url_params::UrlParams;

/// Result of asking a source for an option.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Absent,
    /// Explicit request to fall back to the compiled default.
    Reset,
    Value(RawValue),
}

/// A provider of raw option values.
pub trait SettingSource {
    fn read(&self, descriptor: &OptionDescriptor) -> Lookup;
}

/// Compiled defaults as a source, for symmetry with the override layers.
pub struct CompiledDefaults<'a> {
    detected: &'a DetectedDefaults,
}

impl<'a> CompiledDefaults<'a> {
    pub fn new(detected: &'a DetectedDefaults) -> Self {
        Self { detected }
    }
}

impl SettingSource for CompiledDefaults<'_> {
    fn read(&self, descriptor: &OptionDescriptor) -> Lookup {
        match descriptor.default_value(self.detected).to_json() {
            serde_json::Value::Null => Lookup::Absent,
            json => Lookup::Value(RawValue::Json(json)),
        }
    }
}

/// Everything the resolver reads from its surroundings.
#[derive(Clone)]
pub struct BootEnvironment {
    pub preboot: PrebootConfig,
    pub url: UrlParams,
    pub meta: MetaTags,
    pub storage: Arc<dyn KeyValueStore>,
    pub detected: DetectedDefaults,
    /// Sources are served as optimized bundles.
    pub optimized: bool,
    /// Global debug switch of the loader, independent of the `debug` option.
    pub debug_sources: bool,
}

impl Default for BootEnvironment {
    fn default() -> Self {
        Self {
            preboot: PrebootConfig::default(),
            url: UrlParams::default(),
            meta: MetaTags::default(),
            storage: Arc::new(MemoryStore::default()),
            detected: DetectedDefaults::default(),
            optimized: false,
            debug_sources: false,
        }
    }
}

impl BootEnvironment {
    pub fn with_preboot(mut self, preboot: PrebootConfig) -> Self {
        self.preboot = preboot;
        self
    }

    pub fn with_url(mut self, url: UrlParams) -> Self {
        self.url = url;
        self
    }

    pub fn with_meta(mut self, meta: MetaTags) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_detected(mut self, detected: DetectedDefaults) -> Self {
        self.detected = detected;
        self
    }

    pub fn with_optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }
}
