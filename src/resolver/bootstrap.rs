//! Initialization protocol.
//!
//! Computes the resolved settings for a boot environment. The computation is
//! free of resolver state so that `init` and `reevaluate` share it.

use crate::coerce::coerce;
use crate::error::ConfigError;
use crate::locale::{DetectedDefaults, LanguageTag};
use crate::modes::{AnimationMode, FrameOptions, SyncCallBehavior};
use crate::schema::{describe, descriptors, OptionDescriptor};
use crate::sources::{BootEnvironment, Lookup, SettingSource};
use crate::value::{RawValue, Value};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

pub(crate) type Settings = HashMap<&'static str, Value>;

/// Values set through setters, already coerced.
pub(crate) type Overrides = BTreeMap<&'static str, Value>;

const DEFAULT_FLEX_SERVICES: &str = "/sap/bc/lrep";
const FL_LIBRARY: &str = "sap.ui.fl.library";

/// Outcome of one protocol run.
#[derive(Debug, Clone)]
pub(crate) struct Resolution {
    pub settings: Settings,
    pub sync_call_behavior: SyncCallBehavior,
    pub sap_logon_language: Option<String>,
}

/// Setter values are layered over the pre-boot object and again over the
/// URL, so derived options (`animationMode`, `frameOptions`, `modules`) and
/// the `ignoreUrlParams` gate see them.
pub(crate) fn resolve(
    env: &BootEnvironment,
    overrides: &Overrides,
) -> Result<Resolution, ConfigError> {
    let detected = &env.detected;
    let mut settings: Settings = descriptors()
        .map(|d| (d.name, d.default_value(detected)))
        .collect();

    for descriptor in descriptors() {
        if let Lookup::Value(raw) = env.preboot.read(descriptor) {
            apply_raw(&mut settings, descriptor, &raw, detected, "pre-boot object");
        }
    }

    if let Some(libs) = env.preboot.library_modules() {
        let modules = settings.entry("modules").or_insert(Value::List(Vec::new()));
        let existing = modules.as_list().map(<[String]>::to_vec).unwrap_or_default();
        *modules = Value::List(libs.into_iter().chain(existing).collect());
    }
    apply_overrides(&mut settings, overrides);

    let mut sap_logon_language = None;
    if !flag(&settings, "ignoreUrlParams") {
        apply_url(&mut settings, env);
        sap_logon_language = apply_sap_language(&mut settings, env);
        apply_overrides(&mut settings, overrides);
    }

    collapse_fiori2_adaptation(&mut settings);
    resolve_allowlist(&mut settings, env);
    normalize_frame_options(&mut settings);
    add_flexibility_library(&mut settings);
    log_non_defaults(&settings, detected);
    resolve_animation_mode(&mut settings)?;

    let sync_call_behavior = sync_call_behavior(settings.get("xx-nosync"));

    Ok(Resolution {
        settings,
        sync_call_behavior,
        sap_logon_language,
    })
}

fn apply_overrides(settings: &mut Settings, overrides: &Overrides) {
    for (name, value) in overrides {
        settings.insert(*name, value.clone());
    }
}

/// Coerce and store one raw value; a failure keeps the current value.
fn apply_raw(
    settings: &mut Settings,
    descriptor: &'static OptionDescriptor,
    raw: &RawValue,
    detected: &DetectedDefaults,
    origin: &str,
) {
    match coerce_for_protocol(descriptor, raw, detected) {
        Ok(Value::Unset) => {}
        Ok(value) => {
            settings.insert(descriptor.name, value);
        }
        Err(e) => {
            warn!(
                option = descriptor.name,
                source = origin,
                error = %e,
                "Ignoring unsupported value"
            );
        }
    }
}

/// `animationMode` is validated after derivation, so it is taken verbatim here.
fn coerce_for_protocol(
    descriptor: &OptionDescriptor,
    raw: &RawValue,
    detected: &DetectedDefaults,
) -> Result<Value, ConfigError> {
    if descriptor.name == "animationMode" && !raw.is_absent() {
        return Ok(Value::Str(raw.stringify()));
    }
    coerce(descriptor, raw, detected)
}

fn apply_url(settings: &mut Settings, env: &BootEnvironment) {
    let detected = &env.detected;
    if let Some(statistics) = env.url.statistics() {
        if let Ok(descriptor) = describe("statistics") {
            apply_raw(settings, descriptor, &RawValue::from(statistics), detected, "URL");
        }
    }

    for descriptor in descriptors() {
        match env.url.read(descriptor) {
            Lookup::Absent => {}
            Lookup::Reset => {
                settings.insert(descriptor.name, descriptor.default_value(detected));
            }
            Lookup::Value(raw) => apply_raw(settings, descriptor, &raw, detected, "URL"),
        }
    }
}

/// `sap-language` sets the language from an SAP logon code unless
/// `sap-ui-language` already did.
fn apply_sap_language(settings: &mut Settings, env: &BootEnvironment) -> Option<String> {
    let code = env.url.sap_language()?;
    if env.url.has("sap-ui-language") {
        return Some(code.to_ascii_uppercase());
    }
    match LanguageTag::from_sap_logon(code) {
        Ok(tag) => {
            settings.insert("language", Value::Locale(tag));
            Some(code.to_ascii_uppercase())
        }
        Err(e) => {
            warn!(code, error = %e, "Ignoring invalid sap-language");
            None
        }
    }
}

/// `[]`/`["false"]` turn adaptation off, `["true"]` turns it fully on.
pub(crate) fn collapse_fiori2(value: &Value) -> Value {
    match value.as_list() {
        Some([]) => Value::Bool(false),
        Some([only]) if only == "false" => Value::Bool(false),
        Some([only]) if only == "true" => Value::Bool(true),
        _ => value.clone(),
    }
}

fn collapse_fiori2_adaptation(settings: &mut Settings) {
    if let Some(value) = settings.get_mut("xx-fiori2Adaptation") {
        *value = collapse_fiori2(value);
    }
}

fn non_empty_str<'a>(settings: &'a Settings, name: &str) -> Option<&'a str> {
    settings
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn resolve_allowlist(settings: &mut Settings, env: &BootEnvironment) {
    if non_empty_str(settings, "allowlistService").is_none() {
        if let Some(legacy) = non_empty_str(settings, "whitelistService").map(str::to_string) {
            settings.insert("allowlistService", Value::Str(legacy));
        }
    }

    if non_empty_str(settings, "allowlistService").is_none() {
        if let Ok(descriptor) = describe("allowlistService") {
            if let Lookup::Value(raw) = env.meta.read(descriptor) {
                settings.insert("allowlistService", Value::Str(raw.stringify()));
                if non_empty_str(settings, "frameOptions") == Some("default") {
                    settings.insert("frameOptions", Value::Str("trusted".to_string()));
                }
            }
        }
    }

    if let Some(Value::Object(config)) = settings.get_mut("frameOptionsConfig") {
        let has_allowlist = config.get("allowlist").is_some_and(is_truthy);
        if !has_allowlist {
            if let Some(legacy) = config.get("whitelist").cloned() {
                config.insert("allowlist".to_string(), legacy);
            }
        }
    }
}

fn is_truthy(json: &JsonValue) -> bool {
    match json {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

fn normalize_frame_options(settings: &mut Settings) {
    let current = settings
        .get("frameOptions")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let normalized = FrameOptions::from_lenient(current);
    settings.insert("frameOptions", Value::Str(normalized.as_str().to_string()));
}

fn add_flexibility_library(settings: &mut Settings) {
    let custom_services = non_empty_str(settings, "flexibilityServices")
        .is_some_and(|s| s != DEFAULT_FLEX_SERVICES);
    if !custom_services || flag(settings, "xx-skipAutomaticFlLibLoading") {
        return;
    }
    if let Some(Value::List(modules)) = settings.get_mut("modules") {
        if !modules.iter().any(|m| m == FL_LIBRARY) {
            modules.push(FL_LIBRARY.to_string());
        }
    }
}

fn log_non_defaults(settings: &Settings, detected: &DetectedDefaults) {
    for descriptor in descriptors() {
        if let Some(value) = settings.get(descriptor.name) {
            if *value != descriptor.default_value(detected) {
                info!("  {} = {}", descriptor.name, value);
            }
        }
    }
}

fn resolve_animation_mode(settings: &mut Settings) -> Result<(), ConfigError> {
    let mode = match settings.get("animationMode").and_then(Value::as_str) {
        Some(explicit) => explicit.parse::<AnimationMode>()?,
        None if flag(settings, "animation") => AnimationMode::Full,
        None => AnimationMode::Minimal,
    };
    settings.insert("animationMode", Value::Str(mode.as_str().to_string()));
    settings.insert("animation", Value::Bool(mode.animates()));
    Ok(())
}

/// `warn` reports synchronous requests, `true`/`x` fails them.
pub(crate) fn sync_call_behavior(nosync: Option<&Value>) -> SyncCallBehavior {
    match nosync.and_then(Value::as_str) {
        Some("warn") => SyncCallBehavior::Warn,
        Some(s) if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("x") => {
            SyncCallBehavior::Error
        }
        _ => match nosync {
            Some(Value::Bool(true)) => SyncCallBehavior::Error,
            _ => SyncCallBehavior::Ignore,
        },
    }
}

fn flag(settings: &Settings, name: &str) -> bool {
    settings.get(name).and_then(Value::as_bool).unwrap_or(false)
}
