//! Schema Registry
//!
//! Static table of every recognized option: canonical name, declared type,
//! compiled default and whether the option may be overridden from the URL.
//! The table never changes shape at runtime.

use crate::error::ConfigError;
use crate::locale::DetectedDefaults;
use crate::modes::{ANIMATION_MODES, CALENDAR_WEEK_NUMBERINGS};
use crate::value::Value;
use serde_json::Map;

mod table;

pub use table::OPTIONS;

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    String,
    /// A callable, or the name of one.
    Code,
    StringList,
    Function,
    FunctionList,
    Object,
    Enum(&'static [&'static str]),
    Locale,
}

impl OptionType {
    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::String => "string",
            OptionType::Code => "code",
            OptionType::StringList => "string[]",
            OptionType::Function => "function",
            OptionType::FunctionList => "function[]",
            OptionType::Object => "object",
            OptionType::Enum(_) => "enum",
            OptionType::Locale => "locale",
        }
    }

    /// List and object results are handed out as copies.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            OptionType::StringList | OptionType::FunctionList | OptionType::Object
        )
    }
}

/// Compiled default of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Unset,
    Bool(bool),
    Str(&'static str),
    EmptyList,
    EmptyObject,
    DetectedLanguage,
    LocalTimezone,
}

/// One recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub kind: OptionType,
    pub default: DefaultValue,
    pub url_eligible: bool,
}

impl OptionDescriptor {
    pub const fn new(
        name: &'static str,
        kind: OptionType,
        default: DefaultValue,
        url_eligible: bool,
    ) -> Self {
        Self {
            name,
            kind,
            default,
            url_eligible,
        }
    }

    /// Fresh default value; list defaults are new empty lists every call.
    pub fn default_value(&self, detected: &DetectedDefaults) -> Value {
        match self.default {
            DefaultValue::Unset => Value::Unset,
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Str(s) => Value::Str(s.to_string()),
            DefaultValue::EmptyList => match self.kind {
                OptionType::FunctionList => Value::Functions(Vec::new()),
                _ => Value::List(Vec::new()),
            },
            DefaultValue::EmptyObject => Value::Object(Map::new()),
            DefaultValue::DetectedLanguage => Value::Locale(detected.language.clone()),
            DefaultValue::LocalTimezone => Value::Str(detected.timezone.clone()),
        }
    }

    pub fn has_default(&self) -> bool {
        self.default != DefaultValue::Unset
    }

    /// Whether the compiled default is the boolean `true`.
    pub fn defaults_to_true(&self) -> bool {
        self.default == DefaultValue::Bool(true)
    }

    /// Experimental options carry the `xx-` prefix.
    pub fn is_experimental(&self) -> bool {
        self.name.starts_with("xx-")
    }
}

/// Look up an option by name, ignoring case.
pub fn describe(name: &str) -> Result<&'static OptionDescriptor, ConfigError> {
    OPTIONS
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownOption {
            name: name.to_string(),
            known: known_names(),
        })
}

/// All descriptors in declaration order.
pub fn descriptors() -> impl Iterator<Item = &'static OptionDescriptor> {
    OPTIONS.iter()
}

fn known_names() -> Vec<String> {
    let mut names: Vec<String> = OPTIONS.iter().map(|d| format!("'{}'", d.name)).collect();
    names.sort();
    names
}

pub(crate) const ANIMATION_MODE_TYPE: OptionType = OptionType::Enum(ANIMATION_MODES);
pub(crate) const CALENDAR_WEEK_NUMBERING_TYPE: OptionType =
    OptionType::Enum(CALENDAR_WEEK_NUMBERINGS);
