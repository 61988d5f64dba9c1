//! Type Coercion
//!
//! Converts raw source input into the declared type of an option. Pure: the
//! result depends only on the descriptor, the raw value and the detected
//! environment defaults.

use crate::error::ConfigError;
use crate::locale::{DetectedDefaults, LanguageTag};
use crate::modes::check_enum;
use crate::schema::{OptionDescriptor, OptionType};
use crate::value::{RawValue, Value};
use serde_json::Value as JsonValue;

/// Coerce `raw` to the type declared by `descriptor`.
///
/// An absent raw value yields `Value::Unset`, meaning "use the default".
pub fn coerce(
    descriptor: &OptionDescriptor,
    raw: &RawValue,
    detected: &DetectedDefaults,
) -> Result<Value, ConfigError> {
    if raw.is_absent() {
        return Ok(Value::Unset);
    }
    let name = descriptor.name;

    match descriptor.kind {
        OptionType::Boolean => Ok(Value::Bool(coerce_bool(descriptor, raw))),
        OptionType::String => Ok(Value::Str(raw.stringify())),
        OptionType::Code => match raw {
            RawValue::Function(cb) => Ok(Value::Function(cb.clone())),
            other => Ok(Value::Str(other.stringify())),
        },
        OptionType::StringList => match raw {
            RawValue::Json(JsonValue::Array(items)) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| RawValue::Json(item.clone()).stringify())
                    .collect(),
            )),
            RawValue::Json(JsonValue::String(s)) => Ok(Value::List(split_list(s))),
            _ => Err(ConfigError::unsupported(name, "expected a list or a string")),
        },
        OptionType::Function => match raw {
            RawValue::Function(cb) => Ok(Value::Function(cb.clone())),
            _ => Err(ConfigError::unsupported(name, "expected a function")),
        },
        OptionType::FunctionList => match raw {
            RawValue::Functions(cbs) => Ok(Value::Functions(cbs.clone())),
            RawValue::Json(JsonValue::Array(items)) => match items.first() {
                None => Ok(Value::Functions(Vec::new())),
                Some(item) => Err(ConfigError::unsupported(
                    name,
                    format!("Not a function: {}", item),
                )),
            },
            _ => Err(ConfigError::unsupported(name, "expected a list of functions")),
        },
        OptionType::Object => match raw {
            RawValue::Json(JsonValue::Object(map)) => Ok(Value::Object(map.clone())),
            _ => Err(ConfigError::unsupported(name, "expected an object")),
        },
        OptionType::Locale => {
            let parsed = raw.as_str().and_then(|s| LanguageTag::parse(s).ok());
            match parsed {
                Some(tag) => Ok(Value::Locale(tag)),
                None if descriptor.has_default() => Ok(descriptor.default_value(detected)),
                None => Err(ConfigError::unsupported(
                    name,
                    format!("'{}' is not a valid language tag", raw.stringify()),
                )),
            }
        }
        OptionType::Enum(members) => {
            let value = raw.as_str().map(str::to_string).unwrap_or_else(|| raw.stringify());
            check_enum(name, &value, members)?;
            Ok(Value::Str(value))
        }
    }
}

/// Options that default to `true` only switch off on a literal `"false"`;
/// all others only switch on for `"true"` or `"x"`.
fn coerce_bool(descriptor: &OptionDescriptor, raw: &RawValue) -> bool {
    match raw {
        RawValue::Json(JsonValue::String(s)) => {
            let lower = s.to_lowercase();
            if descriptor.defaults_to_true() {
                lower != "false"
            } else {
                lower == "true" || lower == "x"
            }
        }
        RawValue::Json(JsonValue::Bool(b)) => *b,
        RawValue::Json(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        RawValue::Null | RawValue::Json(JsonValue::Null) => false,
        _ => true,
    }
}

/// Split on space, comma or semicolon and trim each element.
pub fn split_list(s: &str) -> Vec<String> {
    s.split([' ', ',', ';'])
        .map(|part| part.trim().to_string())
        .collect()
}
