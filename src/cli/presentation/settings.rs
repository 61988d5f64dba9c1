//! Settings presentation: resolve, get and describe in text, json and toml.

use crate::error::ApiError;
use crate::locale::DetectedDefaults;
use crate::schema::{DefaultValue, OptionDescriptor, OptionType};
use crate::value::Value;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Map, Value as JsonValue};

/// One resolved setting as shown by `bootconf resolve`.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingRow {
    pub name: &'static str,
    pub kind: &'static str,
    pub value: Value,
    pub is_default: bool,
}

impl SettingRow {
    pub fn new(descriptor: &'static OptionDescriptor, value: Value, detected: &DetectedDefaults) -> Self {
        let is_default = descriptor.default_value(detected) == value;
        Self {
            name: descriptor.name,
            kind: descriptor.kind.label(),
            value,
            is_default,
        }
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Settings table; values that differ from the compiled default are highlighted.
pub fn format_settings_text(rows: &[SettingRow]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Resolved Settings"));
    if rows.is_empty() {
        out.push_str("  All settings have their default values.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Type", "Value", "Source"]);
    for row in rows {
        let (value, source) = if row.is_default {
            (row.value.to_string(), "default".to_string())
        } else {
            (
                format!("{}", row.value.to_string().yellow()),
                "override".to_string(),
            )
        };
        table.add_row(vec![row.name.to_string(), row.kind.to_string(), value, source]);
    }
    out.push_str(&format!("{}\n", table));
    let overridden = rows.iter().filter(|r| !r.is_default).count();
    out.push_str(&format!(
        "\nTotal: {} setting(s), {} overridden\n",
        rows.len(),
        overridden
    ));
    out
}

/// Name to value object, in table order.
pub fn format_settings_json(rows: &[SettingRow]) -> Result<String, ApiError> {
    let map: Map<String, JsonValue> = rows
        .iter()
        .map(|row| (row.name.to_string(), row.value.to_json()))
        .collect();
    Ok(serde_json::to_string_pretty(&JsonValue::Object(map))?)
}

/// TOML document of every set value. Unset settings have no TOML form and
/// are left out.
pub fn format_settings_toml(rows: &[SettingRow]) -> Result<String, ApiError> {
    let mut table = toml::Table::new();
    for row in rows {
        if let Some(value) = json_to_toml(row.value.to_json()) {
            table.insert(row.name.to_string(), value);
        }
    }
    toml::to_string_pretty(&table).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn json_to_toml(json: JsonValue) -> Option<toml::Value> {
    match json {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(toml::Value::Boolean(b)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(toml::Value::Integer)
            .or_else(|| n.as_f64().map(toml::Value::Float)),
        JsonValue::String(s) => Some(toml::Value::String(s)),
        JsonValue::Array(items) => Some(toml::Value::Array(
            items.into_iter().filter_map(json_to_toml).collect(),
        )),
        JsonValue::Object(map) => Some(toml::Value::Table(
            map.into_iter()
                .filter_map(|(k, v)| json_to_toml(v).map(|v| (k, v)))
                .collect(),
        )),
    }
}

pub fn format_value_text(value: &Value) -> String {
    value.to_string()
}

pub fn format_value_json(name: &str, value: &Value) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&json!({ name: value }))?)
}

fn default_label(default: DefaultValue) -> String {
    match default {
        DefaultValue::Unset => "(unset)".to_string(),
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Str("") => "\"\"".to_string(),
        DefaultValue::Str(s) => s.to_string(),
        DefaultValue::EmptyList => "[]".to_string(),
        DefaultValue::EmptyObject => "{}".to_string(),
        DefaultValue::DetectedLanguage => "(detected language)".to_string(),
        DefaultValue::LocalTimezone => "(local timezone)".to_string(),
    }
}

fn allowed_values(kind: OptionType) -> Option<&'static [&'static str]> {
    match kind {
        OptionType::Enum(values) => Some(values),
        _ => None,
    }
}

pub fn format_descriptor_text(descriptor: &OptionDescriptor) -> String {
    let mut out = format!("Setting: {}\n", descriptor.name);
    out.push_str(&format!("Type: {}\n", descriptor.kind.label()));
    out.push_str(&format!("Default: {}\n", default_label(descriptor.default)));
    out.push_str(&format!(
        "URL parameter: {}\n",
        if descriptor.url_eligible {
            format!("sap-ui-{}", descriptor.name)
        } else {
            "no".to_string()
        }
    ));
    if let Some(values) = allowed_values(descriptor.kind) {
        out.push_str(&format!("Allowed: {}\n", values.join(", ")));
    }
    if descriptor.is_experimental() {
        out.push_str("Experimental: yes\n");
    }
    out
}

pub fn format_descriptors_text(descriptors: &[&OptionDescriptor]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Type", "Default", "URL"]);
    for descriptor in descriptors {
        table.add_row(vec![
            descriptor.name.to_string(),
            descriptor.kind.label().to_string(),
            default_label(descriptor.default),
            if descriptor.url_eligible { "yes" } else { "no" }.to_string(),
        ]);
    }
    format!(
        "{}\n\n{}\n\nTotal: {} setting(s)\n",
        format_section_heading("Recognized Settings"),
        table,
        descriptors.len()
    )
}

fn descriptor_json(descriptor: &OptionDescriptor) -> JsonValue {
    json!({
        "name": descriptor.name,
        "type": descriptor.kind.label(),
        "default": default_label(descriptor.default),
        "url_eligible": descriptor.url_eligible,
        "allowed": allowed_values(descriptor.kind),
    })
}

pub fn format_descriptors_json(descriptors: &[&OptionDescriptor]) -> Result<String, ApiError> {
    let list: Vec<JsonValue> = descriptors.iter().map(|d| descriptor_json(d)).collect();
    let out = json!({ "settings": list, "total": descriptors.len() });
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn format_descriptor_json(descriptor: &OptionDescriptor) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&descriptor_json(descriptor))?)
}
