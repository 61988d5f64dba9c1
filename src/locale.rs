//! Language tags and environment language detection.
//!
//! Tags are validated against a relaxed BCP-47 grammar: underscores are
//! accepted as separators and case is ignored. The configured spelling is
//! preserved for `as_configured`, while `Display` renders the normalized tag.

use crate::error::ConfigError;
use std::fmt;

/// Parsed language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag {
    configured: String,
    language: String,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
    extensions: Vec<String>,
    private_use: Option<String>,
}

fn is_alpha(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_digit(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

fn is_alnum(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl LanguageTag {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let invalid = || ConfigError::InvalidLocale(input.to_string());
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let normalized = trimmed.replace('_', "-").to_ascii_lowercase();
        let subtags: Vec<&str> = normalized.split('-').collect();
        if subtags
            .iter()
            .any(|s| s.is_empty() || s.len() > 8 || !is_alnum(s))
        {
            return Err(invalid());
        }

        let mut idx = 0;
        let first = subtags[idx];
        if !is_alpha(first) || first.len() < 2 || first == "x" {
            return Err(invalid());
        }
        let mut language = first.to_string();
        idx += 1;

        // up to three extended language subtags after a 2-3 letter primary
        if first.len() <= 3 {
            let mut extlangs = 0;
            while idx < subtags.len()
                && extlangs < 3
                && subtags[idx].len() == 3
                && is_alpha(subtags[idx])
            {
                language.push('-');
                language.push_str(subtags[idx]);
                idx += 1;
                extlangs += 1;
            }
        }

        let mut script = None;
        if idx < subtags.len() && subtags[idx].len() == 4 && is_alpha(subtags[idx]) {
            let s = subtags[idx];
            script = Some(format!("{}{}", s[..1].to_ascii_uppercase(), &s[1..]));
            idx += 1;
        }

        let mut region = None;
        if idx < subtags.len() {
            let s = subtags[idx];
            if (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && is_digit(s)) {
                region = Some(s.to_ascii_uppercase());
                idx += 1;
            }
        }

        let mut variants = Vec::new();
        while idx < subtags.len() {
            let s = subtags[idx];
            let starts_digit = s.chars().next().is_some_and(|c| c.is_ascii_digit());
            if s.len() >= 5 || (s.len() == 4 && starts_digit) {
                variants.push(s.to_string());
                idx += 1;
            } else {
                break;
            }
        }

        let mut extensions = Vec::new();
        while idx < subtags.len() && subtags[idx].len() == 1 && subtags[idx] != "x" {
            let singleton = subtags[idx];
            idx += 1;
            let mut parts = Vec::new();
            while idx < subtags.len() && subtags[idx].len() >= 2 {
                parts.push(subtags[idx]);
                idx += 1;
            }
            if parts.is_empty() {
                return Err(invalid());
            }
            extensions.push(format!("{}-{}", singleton, parts.join("-")));
        }

        let mut private_use = None;
        if idx < subtags.len() && subtags[idx] == "x" {
            idx += 1;
            if idx >= subtags.len() {
                return Err(invalid());
            }
            private_use = Some(subtags[idx..].join("-"));
            idx = subtags.len();
        }

        if idx != subtags.len() {
            return Err(invalid());
        }

        Ok(Self {
            configured: trimmed.to_string(),
            language,
            script,
            region,
            variants,
            extensions,
            private_use,
        })
    }

    /// Map an SAP logon language code (as found in `sap-language`) to a tag.
    pub fn from_sap_logon(code: &str) -> Result<Self, ConfigError> {
        let mapped = match code.trim().to_ascii_uppercase().as_str() {
            "ZH" => "zh-Hans",
            "ZF" => "zh-Hant",
            "SH" => "sr-Latn",
            "1Q" => "en-US-x-saptrc",
            "2Q" => "en-US-x-sappsd",
            "3Q" => "en-US-x-saprigi",
            _ => return Self::parse(code),
        };
        let mut tag = Self::parse(mapped)?;
        tag.configured = code.trim().to_string();
        Ok(tag)
    }

    /// The spelling this tag was configured with.
    pub fn as_configured(&self) -> &str {
        &self.configured
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn private_use(&self) -> Option<&str> {
        self.private_use.as_deref()
    }

    /// SAP logon language code for this tag.
    pub fn sap_logon_language(&self) -> String {
        match self.private_use.as_deref() {
            Some("saptrc") => return "1Q".to_string(),
            Some("sappsd") => return "2Q".to_string(),
            Some("saprigi") => return "3Q".to_string(),
            _ => {}
        }
        match self.language.as_str() {
            "zh" => {
                let traditional = self.script.as_deref() == Some("Hant")
                    || matches!(self.region.as_deref(), Some("TW" | "HK" | "MO"));
                if traditional { "ZF" } else { "ZH" }.to_string()
            }
            "sr" if self.script.as_deref() == Some("Latn") => "SH".to_string(),
            "he" => "IW".to_string(),
            "yi" => "JI".to_string(),
            "nb" => "NO".to_string(),
            other => other.to_ascii_uppercase(),
        }
    }

    /// Whether the language is written right to left.
    pub fn is_rtl(&self) -> bool {
        matches!(
            self.language.as_str(),
            "ar" | "fa" | "he" | "iw" | "yi" | "ji" | "ur"
        )
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        for variant in &self.variants {
            write!(f, "-{}", variant)?;
        }
        for extension in &self.extensions {
            write!(f, "-{}", extension)?;
        }
        if let Some(private_use) = &self.private_use {
            write!(f, "-x-{}", private_use)?;
        }
        Ok(())
    }
}

/// Environment-dependent defaults for `language` and `timezone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedDefaults {
    pub language: LanguageTag,
    pub timezone: String,
}

impl Default for DetectedDefaults {
    fn default() -> Self {
        Self {
            language: fallback_language(),
            timezone: "UTC".to_string(),
        }
    }
}

fn fallback_language() -> LanguageTag {
    LanguageTag {
        configured: "en".to_string(),
        language: "en".to_string(),
        script: None,
        region: None,
        variants: Vec::new(),
        extensions: Vec::new(),
        private_use: None,
    }
}

impl DetectedDefaults {
    /// Detect from `LC_ALL`, `LC_MESSAGES`, `LANG` and `TZ`.
    pub fn detect() -> Self {
        let language = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| language_from_posix_locale(&value))
            .unwrap_or_else(fallback_language);
        let timezone = std::env::var("TZ")
            .ok()
            .map(|tz| tz.trim_start_matches(':').to_string())
            .filter(|tz| is_plausible_timezone(tz))
            .unwrap_or_else(|| "UTC".to_string());
        Self { language, timezone }
    }

    pub fn with_language(mut self, language: &str) -> Result<Self, ConfigError> {
        self.language = LanguageTag::parse(language)?;
        Ok(self)
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

/// `de_DE.UTF-8@euro` -> `de_DE`; `C` and `POSIX` carry no language.
fn language_from_posix_locale(value: &str) -> Option<LanguageTag> {
    let base = value.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    LanguageTag::parse(base).ok()
}

/// Shape check for IANA identifiers (`UTC`, `Europe/Berlin`, `America/Argentina/Salta`).
pub fn is_plausible_timezone(tz: &str) -> bool {
    if tz.is_empty() || tz.starts_with('/') || tz.ends_with('/') || tz.contains("..") {
        return false;
    }
    tz.split('/').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
    })
}
