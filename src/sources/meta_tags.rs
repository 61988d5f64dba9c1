//! `<meta name="..." content="...">` values of the host document.

use super::{Lookup, SettingSource};
use crate::schema::OptionDescriptor;
use crate::value::RawValue;
use std::collections::HashMap;

pub const ALLOWLIST_META: &str = "sap.allowlistService";
pub const WHITELIST_META: &str = "sap.whitelistService";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTags {
    tags: HashMap<String, String>,
}

impl MetaTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut meta = Self::new();
        for (name, content) in pairs {
            meta.insert(name, content);
        }
        meta
    }

    /// Collect named meta tags from an HTML document. The first tag with a
    /// given name wins, as with a document query.
    pub fn from_html(html: &str) -> Self {
        let mut meta = Self::new();
        let lower = html.to_ascii_lowercase();
        let mut cursor = 0;
        while let Some(offset) = lower[cursor..].find("<meta") {
            let start = cursor + offset + "<meta".len();
            let end = match lower[start..].find('>') {
                Some(e) => start + e,
                None => break,
            };
            let attrs = parse_attributes(&html[start..end]);
            if let (Some(name), Some(content)) = (attrs.get("name"), attrs.get("content")) {
                meta.tags
                    .entry(name.clone())
                    .or_insert_with(|| content.clone());
            }
            cursor = end;
        }
        meta
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.tags.insert(name.into(), content.into());
    }

    /// Content of the named tag; empty content counts as missing.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .get(name)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Allow-list service URL, falling back to the deprecated tag name.
    pub fn allowlist_service(&self) -> Option<&str> {
        self.get(ALLOWLIST_META).or_else(|| self.get(WHITELIST_META))
    }
}

impl SettingSource for MetaTags {
    fn read(&self, descriptor: &OptionDescriptor) -> Lookup {
        match descriptor.name {
            "allowlistService" => match self.allowlist_service() {
                Some(url) => Lookup::Value(RawValue::from(url)),
                None => Lookup::Absent,
            },
            _ => Lookup::Absent,
        }
    }
}

/// Attribute names are lowercased; values keep their case.
fn parse_attributes(tag_body: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let bytes = tag_body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if name_start == i {
            break;
        }
        let name = tag_body[name_start..i].to_ascii_lowercase();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                let value = &tag_body[value_start..i];
                i += 1;
                value
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &tag_body[value_start..i]
            };
            attrs.insert(name, value.to_string());
        } else {
            attrs.insert(name, String::new());
        }
    }
    attrs
}
