//! URL query parameters (`sap-ui-<option>`).

use super::{Lookup, SettingSource};
use crate::error::ConfigError;
use crate::schema::OptionDescriptor;
use crate::value::RawValue;
use url::Url;

const PREFIX: &str = "sap-ui-";

/// Decoded query parameters in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    pairs: Vec<(String, String)>,
}

impl UrlParams {
    /// Parse a bare query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Parse the query part of an absolute URL.
    pub fn from_url(location: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(location)
            .map_err(|e| ConfigError::Source(format!("Invalid URL '{}': {}", location, e)))?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `key`; parameter names are matched ignoring case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `sap-statistics`, read independently of the `sap-ui-` loop.
    pub fn statistics(&self) -> Option<&str> {
        self.get("sap-statistics")
    }

    /// `sap-language`, an SAP logon language code.
    pub fn sap_language(&self) -> Option<&str> {
        self.get("sap-language").filter(|v| !v.is_empty())
    }

    /// Lookup used before initialization: `sap-ui-<name>`, then `sap-<name>`.
    /// Empty values count as absent here.
    pub fn early_lookup(&self, name: &str) -> Option<&str> {
        self.get(&format!("{}{}", PREFIX, name))
            .filter(|v| !v.is_empty())
            .or_else(|| self.get(&format!("sap-{}", name)).filter(|v| !v.is_empty()))
    }
}

impl SettingSource for UrlParams {
    fn read(&self, descriptor: &OptionDescriptor) -> Lookup {
        if !descriptor.url_eligible {
            return Lookup::Absent;
        }
        let mut value = self.get(&format!("{}{}", PREFIX, descriptor.name));
        if value.is_none() && !descriptor.is_experimental() {
            value = self.get(&format!("{}xx-{}", PREFIX, descriptor.name));
        }
        match value {
            None => Lookup::Absent,
            Some("") => Lookup::Reset,
            Some(v) => Lookup::Value(RawValue::from(v)),
        }
    }
}
