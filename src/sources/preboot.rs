//! Pre-boot global settings object.
//!
//! Assembled by the host page before the resolver starts. Keys are matched
//! case-insensitively; experimental options can also be given with an `xx-`
//! prefix.

use super::{Lookup, SettingSource};
use crate::error::ConfigError;
use crate::schema::OptionDescriptor;
use crate::value::RawValue;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrebootConfig {
    entries: BTreeMap<String, RawValue>,
}

impl PrebootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_map(map: Map<String, JsonValue>) -> Self {
        let mut config = Self::new();
        for (key, value) in map {
            config.insert(&key, RawValue::Json(value));
        }
        config
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<JsonValue>(json) {
            Ok(JsonValue::Object(map)) => Ok(Self::from_json_map(map)),
            Ok(_) => Err(ConfigError::Source(
                "pre-boot configuration must be a JSON object".to_string(),
            )),
            Err(e) => Err(ConfigError::Source(format!(
                "Failed to parse pre-boot configuration: {}",
                e
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Source(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Insert or replace an entry; the key is stored lowercased.
    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) -> &mut Self {
        self.entries.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(&key.to_ascii_lowercase())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `libs` shorthand: `"sap.m, sap.ui.layout"` -> module references.
    pub fn library_modules(&self) -> Option<Vec<String>> {
        let libs = self.get_str("libs")?;
        if libs.is_empty() {
            return None;
        }
        Some(
            libs.split(',')
                .map(|lib| format!("{}.library", lib.trim()))
                .collect(),
        )
    }

    /// The host fetched this object with a synchronous request.
    pub fn loaded_via_sync_request(&self) -> bool {
        match self.get("__loaded") {
            Some(RawValue::Json(JsonValue::Bool(b))) => *b,
            Some(raw) => !raw.is_absent(),
            None => false,
        }
    }
}

impl SettingSource for PrebootConfig {
    fn read(&self, descriptor: &OptionDescriptor) -> Lookup {
        if let Some(raw) = self.get(descriptor.name) {
            return Lookup::Value(raw.clone());
        }
        if !descriptor.is_experimental() {
            if let Some(raw) = self.get(&format!("xx-{}", descriptor.name)) {
                return Lookup::Value(raw.clone());
            }
        }
        if descriptor.name == "onInit" {
            if let Some(raw) = self.get("evt-oninit") {
                return Lookup::Value(raw.clone());
            }
        }
        Lookup::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::describe;
    use serde_json::json;

    #[test]
    fn test_keys_are_case_insensitive() {
        let preboot = PrebootConfig::new().with("AnimationMode", "basic");
        assert_eq!(
            preboot.read(describe("animationMode").unwrap()),
            Lookup::Value("basic".into())
        );
    }

    #[test]
    fn test_experimental_alias() {
        let preboot = PrebootConfig::new().with("xx-theme", "sap_fiori_3");
        assert_eq!(
            preboot.read(describe("theme").unwrap()),
            Lookup::Value("sap_fiori_3".into())
        );

        let exact_wins = preboot.clone().with("theme", "sap_horizon");
        assert_eq!(
            exact_wins.read(describe("theme").unwrap()),
            Lookup::Value("sap_horizon".into())
        );
    }

    #[test]
    fn test_oninit_event_alias() {
        let preboot = PrebootConfig::new().with("evt-oninit", "module:app/boot");
        assert_eq!(
            preboot.read(describe("onInit").unwrap()),
            Lookup::Value("module:app/boot".into())
        );
    }

    #[test]
    fn test_library_modules() {
        let preboot = PrebootConfig::new().with("libs", "sap.m, sap.ui.layout");
        assert_eq!(
            preboot.library_modules(),
            Some(vec!["sap.m.library".to_string(), "sap.ui.layout.library".to_string()])
        );
        assert_eq!(PrebootConfig::new().library_modules(), None);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(PrebootConfig::from_json_str("[1, 2]").is_err());
        assert!(PrebootConfig::from_json_str("{not json").is_err());
        let parsed = PrebootConfig::from_json_str(r#"{"theme": "x", "__loaded": true}"#).unwrap();
        assert_eq!(parsed.get("THEME"), Some(&RawValue::Json(json!("x"))));
        assert!(parsed.loaded_via_sync_request());
    }
}
