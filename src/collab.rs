//! Collaborators the resolver delegates to.
//!
//! Localization and formatting state lives behind capability traits; the
//! resolver seeds them from resolved settings at init and forwards setter
//! calls, feeding the returned change sets into its notifier.

use crate::error::ConfigError;
use crate::locale::{is_plausible_timezone, LanguageTag};
use crate::modes::{check_enum, CalendarType, CalendarWeekNumbering, SyncCallBehavior};
use crate::modes::LEGACY_DATE_FORMATS;
use crate::notify::Changes;
use crate::value::Value;
use tracing::warn;

/// Languages shipped with the core message bundles.
pub const LANGUAGES_DELIVERED_WITH_CORE: &[&str] = &[
    "ar", "bg", "ca", "cs", "cy", "da", "de", "el", "en", "en_GB", "es", "es_MX", "et", "fi",
    "fr", "fr_CA", "hi", "hr", "hu", "id", "it", "iw", "ja", "kk", "ko", "lt", "lv", "ms", "nl",
    "no", "pl", "pt", "pt_PT", "ro", "ru", "sh", "sk", "sl", "sv", "th", "tr", "uk", "vi",
    "zh_CN", "zh_TW",
];

/// Initial localization state taken from resolved settings.
#[derive(Debug, Clone)]
pub struct LocalizationSeed {
    pub language: LanguageTag,
    pub sap_logon_language: Option<String>,
    pub timezone: String,
    pub local_timezone: String,
    pub rtl: Option<bool>,
    pub supported_languages: Vec<String>,
}

pub trait Localization: Send {
    fn seed(&mut self, seed: LocalizationSeed);
    fn language(&self) -> &LanguageTag;
    fn set_language(
        &mut self,
        language: &str,
        sap_logon_language: Option<&str>,
    ) -> Result<Changes, ConfigError>;
    fn sap_logon_language(&self) -> String;
    fn timezone(&self) -> &str;
    /// `None` or an implausible identifier resets to the local timezone.
    fn set_timezone(&mut self, timezone: Option<&str>) -> Changes;
    fn rtl(&self) -> bool;
    /// `None` derives the direction from the language again.
    fn set_rtl(&mut self, rtl: Option<bool>) -> Changes;
    fn supported_languages(&self) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct DefaultLocalization {
    language: LanguageTag,
    sap_logon_language: Option<String>,
    timezone: String,
    local_timezone: String,
    rtl: Option<bool>,
    supported_languages: Vec<String>,
}

impl DefaultLocalization {
    pub fn new(language: LanguageTag, local_timezone: impl Into<String>) -> Self {
        let local_timezone = local_timezone.into();
        Self {
            language,
            sap_logon_language: None,
            timezone: local_timezone.clone(),
            local_timezone,
            rtl: None,
            supported_languages: Vec::new(),
        }
    }
}

impl Localization for DefaultLocalization {
    fn seed(&mut self, seed: LocalizationSeed) {
        self.language = seed.language;
        self.sap_logon_language = seed.sap_logon_language;
        self.local_timezone = seed.local_timezone;
        self.timezone = if is_plausible_timezone(&seed.timezone) {
            seed.timezone
        } else {
            self.local_timezone.clone()
        };
        self.rtl = seed.rtl;
        self.supported_languages = seed.supported_languages;
    }

    fn language(&self) -> &LanguageTag {
        &self.language
    }

    fn set_language(
        &mut self,
        language: &str,
        sap_logon_language: Option<&str>,
    ) -> Result<Changes, ConfigError> {
        let tag = LanguageTag::parse(language)?;
        let mut changes = Changes::new();
        let old_rtl = self.rtl();
        if tag.as_configured() != self.language.as_configured()
            || sap_logon_language.map(str::to_string) != self.sap_logon_language
        {
            self.language = tag;
            self.sap_logon_language = sap_logon_language.map(str::to_string);
            changes.insert("language".to_string(), Value::Locale(self.language.clone()));
            if self.rtl() != old_rtl {
                changes.insert("rtl".to_string(), Value::Bool(self.rtl()));
            }
        }
        Ok(changes)
    }

    fn sap_logon_language(&self) -> String {
        self.sap_logon_language
            .clone()
            .unwrap_or_else(|| self.language.sap_logon_language())
    }

    fn timezone(&self) -> &str {
        &self.timezone
    }

    fn set_timezone(&mut self, timezone: Option<&str>) -> Changes {
        let next = match timezone {
            Some(tz) if is_plausible_timezone(tz) => tz.to_string(),
            Some(tz) => {
                warn!(timezone = tz, "Invalid timezone, falling back to the local timezone");
                self.local_timezone.clone()
            }
            None => self.local_timezone.clone(),
        };
        let mut changes = Changes::new();
        if next != self.timezone {
            self.timezone = next;
            changes.insert("timezone".to_string(), Value::Str(self.timezone.clone()));
        }
        changes
    }

    fn rtl(&self) -> bool {
        self.rtl.unwrap_or_else(|| self.language.is_rtl())
    }

    fn set_rtl(&mut self, rtl: Option<bool>) -> Changes {
        let old = self.rtl();
        self.rtl = rtl;
        let mut changes = Changes::new();
        if self.rtl() != old {
            changes.insert("rtl".to_string(), Value::Bool(self.rtl()));
        }
        changes
    }

    fn supported_languages(&self) -> Vec<String> {
        match self.supported_languages.as_slice() {
            [] => Vec::new(),
            [only] if only == "*" => Vec::new(),
            [only] if only == "default" => LANGUAGES_DELIVERED_WITH_CORE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            list => list.to_vec(),
        }
    }
}

/// Initial formatting state taken from resolved settings.
#[derive(Debug, Clone, Default)]
pub struct FormattingSeed {
    pub format_locale: Option<LanguageTag>,
    pub calendar_type: Option<CalendarType>,
    pub calendar_week_numbering: CalendarWeekNumbering,
    pub trailing_currency_code: bool,
}

pub trait Formatting: Send {
    fn seed(&mut self, seed: FormattingSeed);
    /// Explicit format locale; `None` means "follow the language".
    fn format_locale(&self) -> Option<&LanguageTag>;
    fn set_format_locale(&mut self, locale: Option<&str>) -> Result<Changes, ConfigError>;
    /// Explicit calendar, else one implied by the legacy date format.
    fn calendar_type(&self) -> Option<CalendarType>;
    fn set_calendar_type(&mut self, calendar: Option<&str>) -> Result<Changes, ConfigError>;
    fn calendar_week_numbering(&self) -> CalendarWeekNumbering;
    fn set_calendar_week_numbering(&mut self, numbering: &str) -> Result<Changes, ConfigError>;
    fn first_day_of_week(&self) -> Option<u8>;
    fn set_first_day_of_week(&mut self, day: i64) -> Result<Changes, ConfigError>;
    fn legacy_date_format(&self) -> Option<&str>;
    fn set_legacy_date_format(&mut self, code: Option<&str>) -> Result<Changes, ConfigError>;
    fn trailing_currency_code(&self) -> bool;
    fn set_trailing_currency_code(&mut self, trailing: bool) -> Changes;
}

#[derive(Debug, Clone)]
pub struct DefaultFormatting {
    format_locale: Option<LanguageTag>,
    calendar_type: Option<CalendarType>,
    calendar_week_numbering: CalendarWeekNumbering,
    first_day_of_week: Option<u8>,
    legacy_date_format: Option<String>,
    trailing_currency_code: bool,
}

impl Default for DefaultFormatting {
    fn default() -> Self {
        Self {
            format_locale: None,
            calendar_type: None,
            calendar_week_numbering: CalendarWeekNumbering::Default,
            first_day_of_week: None,
            legacy_date_format: None,
            trailing_currency_code: true,
        }
    }
}

fn change(name: &str, value: Value) -> Changes {
    let mut changes = Changes::new();
    changes.insert(name.to_string(), value);
    changes
}

impl Formatting for DefaultFormatting {
    fn seed(&mut self, seed: FormattingSeed) {
        self.format_locale = seed.format_locale;
        self.calendar_type = seed.calendar_type;
        self.calendar_week_numbering = seed.calendar_week_numbering;
        self.trailing_currency_code = seed.trailing_currency_code;
    }

    fn format_locale(&self) -> Option<&LanguageTag> {
        self.format_locale.as_ref()
    }

    fn set_format_locale(&mut self, locale: Option<&str>) -> Result<Changes, ConfigError> {
        let next = locale.map(LanguageTag::parse).transpose()?;
        if next == self.format_locale {
            return Ok(Changes::new());
        }
        self.format_locale = next;
        let value = self
            .format_locale
            .clone()
            .map(Value::Locale)
            .unwrap_or(Value::Unset);
        Ok(change("formatLocale", value))
    }

    fn calendar_type(&self) -> Option<CalendarType> {
        self.calendar_type.or_else(|| {
            self.legacy_date_format
                .as_deref()
                .and_then(CalendarType::from_legacy_date_format)
        })
    }

    fn set_calendar_type(&mut self, calendar: Option<&str>) -> Result<Changes, ConfigError> {
        let next = calendar.map(str::parse::<CalendarType>).transpose()?;
        if next == self.calendar_type {
            return Ok(Changes::new());
        }
        self.calendar_type = next;
        let value = next
            .map(|c| Value::Str(c.as_str().to_string()))
            .unwrap_or(Value::Unset);
        Ok(change("calendarType", value))
    }

    fn calendar_week_numbering(&self) -> CalendarWeekNumbering {
        self.calendar_week_numbering
    }

    fn set_calendar_week_numbering(&mut self, numbering: &str) -> Result<Changes, ConfigError> {
        let next: CalendarWeekNumbering = numbering.parse()?;
        if next == self.calendar_week_numbering {
            return Ok(Changes::new());
        }
        self.calendar_week_numbering = next;
        Ok(change(
            "calendarWeekNumbering",
            Value::Str(next.as_str().to_string()),
        ))
    }

    fn first_day_of_week(&self) -> Option<u8> {
        self.first_day_of_week
    }

    fn set_first_day_of_week(&mut self, day: i64) -> Result<Changes, ConfigError> {
        if !(0..=6).contains(&day) {
            return Err(ConfigError::InvalidArgument(
                "first day of week must be an integer value between 0 and 6".to_string(),
            ));
        }
        let day = day as u8;
        if self.first_day_of_week == Some(day) {
            return Ok(Changes::new());
        }
        self.first_day_of_week = Some(day);
        Ok(change("firstDayOfWeek", Value::Str(day.to_string())))
    }

    fn legacy_date_format(&self) -> Option<&str> {
        self.legacy_date_format.as_deref()
    }

    fn set_legacy_date_format(&mut self, code: Option<&str>) -> Result<Changes, ConfigError> {
        let next = match code {
            Some(code) => {
                let upper = code.to_ascii_uppercase();
                check_enum("legacyDateFormat", &upper, LEGACY_DATE_FORMATS)?;
                Some(upper)
            }
            None => None,
        };
        if next == self.legacy_date_format {
            return Ok(Changes::new());
        }
        self.legacy_date_format = next;
        let value = self
            .legacy_date_format
            .clone()
            .map(Value::Str)
            .unwrap_or(Value::Unset);
        Ok(change("legacyDateFormat", value))
    }

    fn trailing_currency_code(&self) -> bool {
        self.trailing_currency_code
    }

    fn set_trailing_currency_code(&mut self, trailing: bool) -> Changes {
        if trailing == self.trailing_currency_code {
            return Changes::new();
        }
        self.trailing_currency_code = trailing;
        change("trailingCurrencyCode", Value::Bool(trailing))
    }
}

/// The module loading subsystem, as far as the resolver configures it.
pub trait ModuleLoader: Send {
    fn set_report_sync_calls(&mut self, behavior: SyncCallBehavior);
    fn report_sync_calls(&self) -> SyncCallBehavior;
    fn is_async(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct LoaderSettings {
    pub async_mode: bool,
    pub report_sync_calls: SyncCallBehavior,
}

impl LoaderSettings {
    pub fn new(async_mode: bool) -> Self {
        Self {
            async_mode,
            report_sync_calls: SyncCallBehavior::Ignore,
        }
    }
}

impl ModuleLoader for LoaderSettings {
    fn set_report_sync_calls(&mut self, behavior: SyncCallBehavior) {
        self.report_sync_calls = behavior;
    }

    fn report_sync_calls(&self) -> SyncCallBehavior {
        self.report_sync_calls
    }

    fn is_async(&self) -> bool {
        self.async_mode
    }
}
