//! Compatibility versions.
//!
//! Features whose behavior changed between runtime releases can be pinned to
//! an older version with `compatVersion` (all features) or
//! `compatVersion-<feature>` (one feature). Only major and minor matter.

use crate::error::ConfigError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Runtime release the resolver reports as its own version; `edge` maps here.
pub const RUNTIME_VERSION: &str = "1.120.0";

const BASE_VERSION: Version = Version::new(1, 14, 0);

/// Known features and the version each one defaults to.
pub const COMPAT_FEATURES: &[(&str, &str)] = &[
    ("xx-test", "1.15"),
    ("flexBoxPolyfill", "1.14"),
    ("sapMeTabContainer", "1.14"),
    ("sapMeProgessIndicator", "1.14"),
    ("sapMGrowingList", "1.14"),
    ("sapMListAsTable", "1.14"),
    ("sapMDialogWithPadding", "1.14"),
    ("sapCoreBindingSyntax", "1.24"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    suffix: String,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: String::new(),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Same version with patch and suffix dropped.
    pub fn major_minor(&self) -> Self {
        Self::new(self.major, self.minor, 0)
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    /// `1.120.0`, `1.24`, `2` and `1.120.0-SNAPSHOT` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidArgument(format!("Invalid version string '{}'", s));
        let trimmed = s.trim();
        let numeric_end = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (numbers, suffix) = trimmed.split_at(numeric_end);
        let numbers = numbers.trim_end_matches('.');
        if numbers.is_empty() {
            return Err(invalid());
        }
        let mut parts = [0u32; 3];
        for (i, part) in numbers.split('.').enumerate() {
            if i >= parts.len() {
                return Err(invalid());
            }
            parts[i] = part.parse().map_err(|_| invalid())?;
        }
        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            suffix: suffix.trim_start_matches(['-', '_', '.']).to_string(),
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.suffix.is_empty(), other.suffix.is_empty()) {
                (true, true) => Ordering::Equal,
                // a pre-release sorts before its release
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.suffix.cmp(&other.suffix),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.suffix.is_empty() {
            write!(f, "-{}", self.suffix)?;
        }
        Ok(())
    }
}

/// The runtime's own version.
pub fn runtime_version() -> Version {
    RUNTIME_VERSION
        .parse()
        .unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Compatibility version for `feature` (or the global default when `None`
/// or unknown). `lookup` answers raw setting strings by lowercased key.
pub fn compatibility_version<F>(lookup: F, feature: Option<&str>) -> Version
where
    F: Fn(&str) -> Option<String>,
{
    let global = lookup("compatversion").filter(|v| !v.is_empty());
    let feature_base = feature.and_then(|name| {
        COMPAT_FEATURES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, base)| *base)
    });

    let raw = match feature_base {
        Some(base) => feature
            .and_then(|name| lookup(&format!("compatversion-{}", name.to_ascii_lowercase())))
            .filter(|v| !v.is_empty())
            .or(global)
            .unwrap_or_else(|| base.to_string()),
        None => global.unwrap_or_else(|| BASE_VERSION.to_string()),
    };

    let parsed = if raw.eq_ignore_ascii_case("edge") {
        Ok(runtime_version())
    } else {
        raw.parse::<Version>()
    };
    match parsed {
        Ok(version) => version.major_minor(),
        Err(e) => {
            warn!(error = %e, "Ignoring compatibility version");
            BASE_VERSION
        }
    }
}
