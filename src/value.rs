//! Raw and resolved setting values.
//!
//! `RawValue` is whatever a source hands over before coercion: JSON data from
//! the pre-boot object, strings from the URL or meta tags, or callables
//! registered by the embedding application. `Value` is the typed result that
//! lives in the resolved settings map.

use crate::locale::LanguageTag;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

type CallbackFn = dyn Fn(&JsonValue) -> JsonValue + Send + Sync;

/// Named callable supplied through the pre-boot object or a setter.
///
/// Equality is identity: two callbacks are equal only when they share the
/// same underlying closure.
#[derive(Clone)]
pub struct Callback {
    label: String,
    func: Arc<CallbackFn>,
}

impl Callback {
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&JsonValue) -> JsonValue + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn call(&self, arg: &JsonValue) -> JsonValue {
        (self.func)(arg)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.label)
    }
}

/// Uncoerced input as read from a source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Json(JsonValue),
    Function(Callback),
    Functions(Vec<Callback>),
}

impl RawValue {
    /// `null` and JSON `null` both mean "no value supplied".
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Null | RawValue::Json(JsonValue::Null))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Json(JsonValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Display form used when a raw value has to become a string.
    pub fn stringify(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Json(json) => stringify_json(json),
            RawValue::Function(cb) => cb.label().to_string(),
            RawValue::Functions(cbs) => cbs
                .iter()
                .map(|cb| cb.label())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn stringify_json(json: &JsonValue) -> String {
    match json {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(items) => items
            .iter()
            .map(stringify_json)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => json.to_string(),
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Json(JsonValue::String(s.to_string()))
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Json(JsonValue::String(s))
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Json(JsonValue::Bool(b))
    }
}

impl From<JsonValue> for RawValue {
    fn from(json: JsonValue) -> Self {
        RawValue::Json(json)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(items: Vec<&str>) -> Self {
        RawValue::Json(JsonValue::Array(
            items
                .into_iter()
                .map(|s| JsonValue::String(s.to_string()))
                .collect(),
        ))
    }
}

impl From<Vec<String>> for RawValue {
    fn from(items: Vec<String>) -> Self {
        RawValue::Json(JsonValue::Array(
            items.into_iter().map(JsonValue::String).collect(),
        ))
    }
}

impl From<Callback> for RawValue {
    fn from(cb: Callback) -> Self {
        RawValue::Function(cb)
    }
}

impl From<Vec<Callback>> for RawValue {
    fn from(cbs: Vec<Callback>) -> Self {
        RawValue::Functions(cbs)
    }
}

/// A resolved, typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unset,
    Bool(bool),
    Str(String),
    List(Vec<String>),
    Object(Map<String, JsonValue>),
    Function(Callback),
    Functions(Vec<Callback>),
    Locale(LanguageTag),
}

impl Value {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_locale(&self) -> Option<&LanguageTag> {
        match self {
            Value::Locale(tag) => Some(tag),
            _ => None,
        }
    }

    /// JSON rendering; callables render as `"<function label>"`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Unset => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::List(items) => {
                JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect())
            }
            Value::Object(map) => JsonValue::Object(map.clone()),
            Value::Function(cb) => JsonValue::String(format!("<function {}>", cb.label())),
            Value::Functions(cbs) => JsonValue::Array(
                cbs.iter()
                    .map(|cb| JsonValue::String(format!("<function {}>", cb.label())))
                    .collect(),
            ),
            Value::Locale(tag) => JsonValue::String(tag.as_configured().to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unset => write!(f, "undefined"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Locale(tag) => write!(f, "{}", tag.as_configured()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
