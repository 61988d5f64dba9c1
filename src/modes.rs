//! Typed views of enumerated settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ANIMATION_MODES: &[&str] = &["full", "basic", "minimal", "none"];

pub const CALENDAR_WEEK_NUMBERINGS: &[&str] =
    &["Default", "ISO_8601", "MiddleEastern", "WesternTraditional"];

pub const CALENDAR_TYPES: &[&str] = &["Gregorian", "Islamic", "Japanese", "Persian", "Buddhist"];

pub const LEGACY_DATE_FORMATS: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C"];

fn invalid(name: &str, value: &str, allowed: &[&str]) -> ConfigError {
    ConfigError::InvalidEnumValue {
        name: name.to_string(),
        value: value.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

/// Check `value` against an enumeration's members.
pub fn check_enum(name: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, value, allowed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    Full,
    Basic,
    Minimal,
    None,
}

impl AnimationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationMode::Full => "full",
            AnimationMode::Basic => "basic",
            AnimationMode::Minimal => "minimal",
            AnimationMode::None => "none",
        }
    }

    /// Whether the legacy `animation` flag is on under this mode.
    pub fn animates(&self) -> bool {
        !matches!(self, AnimationMode::Minimal | AnimationMode::None)
    }
}

impl FromStr for AnimationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(AnimationMode::Full),
            "basic" => Ok(AnimationMode::Basic),
            "minimal" => Ok(AnimationMode::Minimal),
            "none" => Ok(AnimationMode::None),
            other => Err(invalid("animationMode", other, ANIMATION_MODES)),
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalendarWeekNumbering {
    #[default]
    Default,
    #[serde(rename = "ISO_8601")]
    Iso8601,
    MiddleEastern,
    WesternTraditional,
}

impl CalendarWeekNumbering {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarWeekNumbering::Default => "Default",
            CalendarWeekNumbering::Iso8601 => "ISO_8601",
            CalendarWeekNumbering::MiddleEastern => "MiddleEastern",
            CalendarWeekNumbering::WesternTraditional => "WesternTraditional",
        }
    }
}

impl FromStr for CalendarWeekNumbering {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Default" => Ok(CalendarWeekNumbering::Default),
            "ISO_8601" => Ok(CalendarWeekNumbering::Iso8601),
            "MiddleEastern" => Ok(CalendarWeekNumbering::MiddleEastern),
            "WesternTraditional" => Ok(CalendarWeekNumbering::WesternTraditional),
            other => Err(invalid(
                "calendarWeekNumbering",
                other,
                CALENDAR_WEEK_NUMBERINGS,
            )),
        }
    }
}

impl fmt::Display for CalendarWeekNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarType {
    Gregorian,
    Islamic,
    Japanese,
    Persian,
    Buddhist,
}

impl CalendarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarType::Gregorian => "Gregorian",
            CalendarType::Islamic => "Islamic",
            CalendarType::Japanese => "Japanese",
            CalendarType::Persian => "Persian",
            CalendarType::Buddhist => "Buddhist",
        }
    }

    /// Calendar implied by a legacy date format code.
    pub fn from_legacy_date_format(code: &str) -> Option<Self> {
        match code {
            "A" | "B" => Some(CalendarType::Islamic),
            "7" | "8" | "9" => Some(CalendarType::Japanese),
            "C" => Some(CalendarType::Persian),
            _ => None,
        }
    }
}

impl FromStr for CalendarType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gregorian" => Ok(CalendarType::Gregorian),
            "Islamic" => Ok(CalendarType::Islamic),
            "Japanese" => Ok(CalendarType::Japanese),
            "Persian" => Ok(CalendarType::Persian),
            "Buddhist" => Ok(CalendarType::Buddhist),
            other => Err(invalid("calendarType", other, CALENDAR_TYPES)),
        }
    }
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved `frameOptions`; anything unrecognized resolves to `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameOptions {
    Allow,
    Deny,
    Trusted,
}

impl FrameOptions {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameOptions::Allow => "allow",
            FrameOptions::Deny => "deny",
            FrameOptions::Trusted => "trusted",
        }
    }

    pub fn from_lenient(s: &str) -> Self {
        match s {
            "deny" => FrameOptions::Deny,
            "trusted" => FrameOptions::Trusted,
            _ => FrameOptions::Allow,
        }
    }
}

/// How the module loader reports synchronous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SyncCallBehavior {
    #[default]
    Ignore = 0,
    Warn = 1,
    Error = 2,
}

impl SyncCallBehavior {
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

/// Resolved `xx-fiori2Adaptation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fiori2Adaptation {
    Off,
    Full,
    Partial(Vec<String>),
}
