//! Settings Resolver
//!
//! Owns the resolved settings of one boot environment. Values are computed
//! once by `init` from layered sources (compiled defaults, pre-boot object,
//! URL parameters, meta tags) and can then be changed through setters, which
//! feed the change notifier. Localization and formatting state is delegated
//! to collaborators that are seeded from the resolved values.

mod accessors;
pub(crate) mod bootstrap;

pub use accessors::{FlexibilityService, FormatSettings};

use crate::coerce::coerce;
use crate::collab::{
    DefaultFormatting, DefaultLocalization, Formatting, FormattingSeed, LoaderSettings,
    Localization, LocalizationSeed, ModuleLoader,
};
use crate::error::ConfigError;
use crate::locale::LanguageTag;
use crate::modes::{CalendarType, CalendarWeekNumbering, SyncCallBehavior};
use crate::notify::{ChangeBus, ChangeEvent, ChangeNotifier, Changes, ListenerId, NotifierState};
use crate::schema::{describe, descriptors, OptionDescriptor};
use crate::sources::{BootEnvironment, Lookup, SettingSource};
use crate::value::{RawValue, Value};
use bootstrap::{Overrides, Settings};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::Receiver;
use tracing::{debug, error, warn};

/// Change listener. It receives the resolver so it can react with further
/// changes; those are delivered as a follow-up event.
pub type Listener = Box<dyn FnMut(&ChangeEvent, &mut SettingsResolver) + Send>;

pub struct SettingsResolver {
    env: BootEnvironment,
    settings: Settings,
    /// Values set through setters; they survive re-evaluation.
    explicit: Overrides,
    sap_logon_language: Option<String>,
    initialized: bool,
    notifier: ChangeNotifier,
    listeners: Vec<(ListenerId, Listener)>,
    removed_listeners: HashSet<ListenerId>,
    next_listener_id: u64,
    localization: Box<dyn Localization>,
    formatting: Box<dyn Formatting>,
    loader: Box<dyn ModuleLoader>,
}

impl SettingsResolver {
    /// Uninitialized resolver with in-memory collaborators.
    pub fn new(env: BootEnvironment) -> Self {
        let localization =
            DefaultLocalization::new(env.detected.language.clone(), env.detected.timezone.clone());
        Self::with_collaborators(
            env,
            Box::new(localization),
            Box::new(DefaultFormatting::default()),
            Box::new(LoaderSettings::new(true)),
        )
    }

    pub fn with_collaborators(
        env: BootEnvironment,
        localization: Box<dyn Localization>,
        formatting: Box<dyn Formatting>,
        loader: Box<dyn ModuleLoader>,
    ) -> Self {
        Self {
            env,
            settings: Settings::new(),
            explicit: BTreeMap::new(),
            sap_logon_language: None,
            initialized: false,
            notifier: ChangeNotifier::new(),
            listeners: Vec::new(),
            removed_listeners: HashSet::new(),
            next_listener_id: 0,
            localization,
            formatting,
            loader,
        }
    }

    /// Run the initialization protocol. A second call is a no-op.
    pub fn init(&mut self) -> Result<(), ConfigError> {
        if self.initialized {
            debug!("Settings already initialized");
            return Ok(());
        }
        let resolution = bootstrap::resolve(&self.env, &self.explicit)?;
        self.settings = resolution.settings;
        if self.sap_logon_language.is_none() {
            self.sap_logon_language = resolution.sap_logon_language;
        }
        self.initialized = true;
        self.configure_loader(resolution.sync_call_behavior);
        self.seed_collaborators();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn environment(&self) -> &BootEnvironment {
        &self.env
    }

    /// Current value of `name`. Always an owned copy.
    pub fn get(&self, name: &str) -> Result<Value, ConfigError> {
        let descriptor = describe(name)?;
        Ok(self.current(descriptor))
    }

    /// Snapshot of every option in declaration order.
    pub fn snapshot(&self) -> Vec<(&'static OptionDescriptor, Value)> {
        descriptors().map(|d| (d, self.current(d))).collect()
    }

    pub(crate) fn current(&self, descriptor: &'static OptionDescriptor) -> Value {
        if self.initialized {
            return self
                .settings
                .get(descriptor.name)
                .cloned()
                .unwrap_or_else(|| descriptor.default_value(&self.env.detected));
        }
        match self.explicit.get(descriptor.name) {
            Some(value) => value.clone(),
            None => self.early_value(descriptor),
        }
    }

    /// Value computed on demand before `init`, without touching state.
    fn early_value(&self, descriptor: &'static OptionDescriptor) -> Value {
        let detected = &self.env.detected;
        let fallback = || descriptor.default_value(detected);
        let from_raw = |raw: &RawValue| match coerce(descriptor, raw, detected) {
            Ok(Value::Unset) | Err(_) => fallback(),
            Ok(value) => value,
        };

        if descriptor.url_eligible && !self.early_ignore_url_params() {
            if let Some(value) = self.env.url.early_lookup(descriptor.name) {
                return from_raw(&RawValue::from(value));
            }
        }
        match self.env.preboot.read(descriptor) {
            Lookup::Value(raw) => from_raw(&raw),
            _ => fallback(),
        }
    }

    fn early_ignore_url_params(&self) -> bool {
        if let Some(value) = self.explicit.get("ignoreUrlParams") {
            return value.as_bool().unwrap_or(false);
        }
        match describe("ignoreUrlParams") {
            Ok(descriptor) => match self.env.preboot.read(descriptor) {
                Lookup::Value(raw) => coerce(descriptor, &raw, &self.env.detected)
                    .ok()
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                _ => false,
            },
            Err(_) => false,
        }
    }

    /// Set one option. Options backed by a collaborator are routed to their
    /// dedicated setter; everything else is coerced and stored.
    pub fn set(&mut self, name: &str, raw: impl Into<RawValue>) -> Result<(), ConfigError> {
        let descriptor = describe(name)?;
        let raw = raw.into();
        match descriptor.name {
            "language" => match raw.as_str() {
                Some(language) => {
                    let language = language.to_string();
                    self.set_language(&language)
                }
                None => Err(ConfigError::unsupported("language", "expected a string")),
            },
            "timezone" => {
                let timezone = match coerce(descriptor, &raw, &self.env.detected)? {
                    Value::Str(tz) => Some(tz),
                    _ => None,
                };
                self.set_timezone(timezone.as_deref());
                Ok(())
            }
            "rtl" => {
                let rtl = match coerce(descriptor, &raw, &self.env.detected)? {
                    Value::Bool(b) => Some(b),
                    _ => None,
                };
                self.set_rtl(rtl);
                Ok(())
            }
            "formatLocale" => {
                let locale = match coerce(descriptor, &raw, &self.env.detected)? {
                    Value::Locale(tag) => Some(tag.as_configured().to_string()),
                    _ => None,
                };
                self.set_format_locale(locale.as_deref())
            }
            "calendarType" => {
                let calendar = optional_text(descriptor, &raw)?;
                self.set_calendar_type(calendar.as_deref())
            }
            "calendarWeekNumbering" => {
                let numbering = required_text(descriptor, &raw)?;
                self.set_calendar_week_numbering(&numbering)
            }
            "trailingCurrencyCode" => {
                let trailing = coerce(descriptor, &raw, &self.env.detected)?
                    .as_bool()
                    .unwrap_or(true);
                self.set_trailing_currency_code(trailing);
                Ok(())
            }
            "animationMode" => {
                let mode = required_text(descriptor, &raw)?;
                self.set_animation_mode(&mode)
            }
            _ => self.set_value(descriptor, &raw),
        }
    }

    /// Generic path: coerce, store, record the change if the value differs.
    fn set_value(
        &mut self,
        descriptor: &'static OptionDescriptor,
        raw: &RawValue,
    ) -> Result<(), ConfigError> {
        let value = match coerce(descriptor, raw, &self.env.detected)? {
            Value::Unset => descriptor.default_value(&self.env.detected),
            value => value,
        };
        self.store(descriptor, value);
        Ok(())
    }

    pub(crate) fn store(&mut self, descriptor: &'static OptionDescriptor, value: Value) {
        let previous = self.current(descriptor);
        self.explicit.insert(descriptor.name, value.clone());
        if self.initialized {
            self.settings.insert(descriptor.name, value.clone());
        }
        if previous != value {
            let event = self.notifier.record(descriptor.name, value);
            self.dispatch(event);
        }
    }

    /// Mirror a collaborator update: `primary` is the option that was set,
    /// `changes` everything the collaborator reports as changed.
    fn commit_collaborator(&mut self, primary: &'static str, value: Value, changes: Changes) {
        self.explicit.insert(primary, value.clone());
        self.settings.insert(primary, value);
        let event = self.notifier.record_all(changes);
        self.dispatch(event);
    }

    fn store_named(&mut self, name: &'static str, value: Value) -> Result<(), ConfigError> {
        let descriptor = describe(name)?;
        self.store(descriptor, value);
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), ConfigError> {
        self.set_language_with_logon(language, None)
    }

    /// Set the language together with an explicit SAP logon language code.
    pub fn set_language_with_logon(
        &mut self,
        language: &str,
        sap_logon_language: Option<&str>,
    ) -> Result<(), ConfigError> {
        let tag = LanguageTag::parse(language)?;
        if !self.initialized {
            self.sap_logon_language = sap_logon_language.map(str::to_string);
            return self.store_named("language", Value::Locale(tag));
        }
        let changes = self
            .localization
            .set_language(language, sap_logon_language)?;
        self.sap_logon_language = sap_logon_language.map(str::to_string);
        let value = Value::Locale(self.localization.language().clone());
        self.commit_collaborator("language", value, changes);
        Ok(())
    }

    /// `None` resets to the local timezone.
    pub fn set_timezone(&mut self, timezone: Option<&str>) {
        if !self.initialized {
            let value = match timezone {
                Some(tz) if crate::locale::is_plausible_timezone(tz) => Value::Str(tz.to_string()),
                _ => Value::Str(self.env.detected.timezone.clone()),
            };
            if let Ok(descriptor) = describe("timezone") {
                self.store(descriptor, value);
            }
            return;
        }
        let changes = self.localization.set_timezone(timezone);
        let value = Value::Str(self.localization.timezone().to_string());
        self.commit_collaborator("timezone", value, changes);
    }

    /// `None` derives the direction from the language again.
    pub fn set_rtl(&mut self, rtl: Option<bool>) {
        let value = rtl.map(Value::Bool).unwrap_or(Value::Unset);
        if !self.initialized {
            if let Ok(descriptor) = describe("rtl") {
                self.store(descriptor, value);
            }
            return;
        }
        let changes = self.localization.set_rtl(rtl);
        self.commit_collaborator("rtl", value, changes);
    }

    /// `None` clears the format locale; an invalid tag is `UnsupportedValue`.
    pub fn set_format_locale(&mut self, locale: Option<&str>) -> Result<(), ConfigError> {
        let tag = locale
            .map(|s| {
                LanguageTag::parse(s).map_err(|_| {
                    ConfigError::unsupported(
                        "formatLocale",
                        format!("'{}' is not a valid language tag", s),
                    )
                })
            })
            .transpose()?;
        let value = tag.map(Value::Locale).unwrap_or(Value::Unset);
        if !self.initialized {
            return self.store_named("formatLocale", value);
        }
        let changes = self.formatting.set_format_locale(locale)?;
        self.commit_collaborator("formatLocale", value, changes);
        Ok(())
    }

    pub fn set_calendar_type(&mut self, calendar: Option<&str>) -> Result<(), ConfigError> {
        let parsed = calendar.map(str::parse::<CalendarType>).transpose()?;
        let value = parsed
            .map(|c| Value::Str(c.as_str().to_string()))
            .unwrap_or(Value::Unset);
        if !self.initialized {
            return self.store_named("calendarType", value);
        }
        let changes = self.formatting.set_calendar_type(calendar)?;
        self.commit_collaborator("calendarType", value, changes);
        Ok(())
    }

    pub fn set_calendar_week_numbering(&mut self, numbering: &str) -> Result<(), ConfigError> {
        let parsed: CalendarWeekNumbering = numbering.parse()?;
        let value = Value::Str(parsed.as_str().to_string());
        if !self.initialized {
            return self.store_named("calendarWeekNumbering", value);
        }
        let changes = self.formatting.set_calendar_week_numbering(numbering)?;
        self.commit_collaborator("calendarWeekNumbering", value, changes);
        Ok(())
    }

    pub fn set_trailing_currency_code(&mut self, trailing: bool) {
        if !self.initialized {
            if let Ok(descriptor) = describe("trailingCurrencyCode") {
                self.store(descriptor, Value::Bool(trailing));
            }
            return;
        }
        let changes = self.formatting.set_trailing_currency_code(trailing);
        self.commit_collaborator("trailingCurrencyCode", Value::Bool(trailing), changes);
    }

    /// Day 0 is Sunday; anything outside 0..=6 is rejected.
    pub fn set_first_day_of_week(&mut self, day: i64) -> Result<(), ConfigError> {
        let changes = self.formatting.set_first_day_of_week(day)?;
        let event = self.notifier.record_all(changes);
        self.dispatch(event);
        Ok(())
    }

    pub fn set_legacy_date_format(&mut self, code: Option<&str>) -> Result<(), ConfigError> {
        let changes = self.formatting.set_legacy_date_format(code)?;
        let event = self.notifier.record_all(changes);
        self.dispatch(event);
        Ok(())
    }

    /// Validated; the legacy `animation` flag follows the mode.
    pub fn set_animation_mode(&mut self, mode: &str) -> Result<(), ConfigError> {
        let parsed: crate::modes::AnimationMode = mode.parse()?;
        self.begin_batch();
        let result = self
            .store_named("animation", Value::Bool(parsed.animates()))
            .and_then(|_| self.store_named("animationMode", Value::Str(parsed.as_str().to_string())));
        self.end_batch();
        result
    }

    /// Apply many settings with one aggregated notification. Unknown names
    /// are skipped with a warning; the first failing setter aborts the rest.
    pub fn apply_many<I, K, V>(&mut self, settings: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        self.begin_batch();
        let mut result = Ok(());
        for (name, raw) in settings {
            if let Err(e) = self.apply_one(name.as_ref(), raw.into()) {
                result = Err(e);
                break;
            }
        }
        self.end_batch();
        result
    }

    fn apply_one(&mut self, name: &str, raw: RawValue) -> Result<(), ConfigError> {
        if name == "formatSettings" {
            return self.apply_format_settings(raw);
        }
        match describe(name) {
            Ok(_) => self.set(name, raw),
            Err(_) => {
                warn!(setting = name, "Unknown setting ignored");
                Ok(())
            }
        }
    }

    fn apply_format_settings(&mut self, raw: RawValue) -> Result<(), ConfigError> {
        let map = match raw {
            RawValue::Json(JsonValue::Object(map)) => map,
            _ => {
                return Err(ConfigError::unsupported(
                    "formatSettings",
                    "expected an object",
                ))
            }
        };
        for (name, value) in map {
            match name.as_str() {
                "firstDayOfWeek" => {
                    let day = value.as_i64().ok_or_else(|| {
                        ConfigError::InvalidArgument(
                            "first day of week must be an integer value between 0 and 6"
                                .to_string(),
                        )
                    })?;
                    self.set_first_day_of_week(day)?;
                }
                "legacyDateFormat" => {
                    let code = match &value {
                        JsonValue::Null => None,
                        JsonValue::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    };
                    self.set_legacy_date_format(code.as_deref())?;
                }
                "trailingCurrencyCode" => {
                    let descriptor = describe("trailingCurrencyCode")?;
                    let trailing = coerce(descriptor, &RawValue::Json(value), &self.env.detected)?
                        .as_bool()
                        .unwrap_or(true);
                    self.set_trailing_currency_code(trailing);
                }
                other => {
                    warn!(setting = other, "Unknown format setting ignored");
                }
            }
        }
        Ok(())
    }

    /// Re-run the protocol against new inputs and apply the differences in
    /// one batch. Setter values stay on top.
    pub fn reevaluate(&mut self, env: BootEnvironment) -> Result<(), ConfigError> {
        if !self.initialized {
            self.env = env;
            return self.init();
        }
        let resolution = bootstrap::resolve(&env, &self.explicit)?;
        self.env = env;
        let mut next = resolution.settings;

        let mut changes = Changes::new();
        for descriptor in descriptors() {
            let value = next
                .remove(descriptor.name)
                .unwrap_or_else(|| descriptor.default_value(&self.env.detected));
            if self.settings.get(descriptor.name) != Some(&value) {
                changes.insert(descriptor.name.to_string(), value.clone());
                self.settings.insert(descriptor.name, value);
            }
        }
        if !self.explicit.contains_key("language") {
            self.sap_logon_language = resolution.sap_logon_language;
        }

        self.begin_batch();
        self.configure_loader(resolution.sync_call_behavior);
        self.seed_collaborators();
        let event = self.notifier.record_all(changes);
        self.dispatch(event);
        self.end_batch();
        Ok(())
    }

    fn configure_loader(&mut self, behavior: SyncCallBehavior) {
        self.loader.set_report_sync_calls(behavior);
        if behavior != SyncCallBehavior::Ignore && self.env.preboot.loaded_via_sync_request() {
            let message = "[nosync]: configuration loaded via sync XHR";
            if behavior == SyncCallBehavior::Warn {
                warn!("{}", message);
            } else {
                error!("{}", message);
            }
        }
    }

    fn seed_collaborators(&mut self) {
        let language = self
            .settings
            .get("language")
            .and_then(Value::as_locale)
            .cloned()
            .unwrap_or_else(|| self.env.detected.language.clone());
        let timezone = self
            .settings
            .get("timezone")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.env.detected.timezone.clone());
        self.localization.seed(LocalizationSeed {
            language,
            sap_logon_language: self.sap_logon_language.clone(),
            timezone,
            local_timezone: self.env.detected.timezone.clone(),
            rtl: self.settings.get("rtl").and_then(Value::as_bool),
            supported_languages: self.list_setting("xx-supportedLanguages"),
        });

        let calendar_type = self
            .settings
            .get("calendarType")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse::<CalendarType>() {
                Ok(calendar) => Some(calendar),
                Err(e) => {
                    warn!(error = %e, "Ignoring calendar type");
                    None
                }
            });
        let calendar_week_numbering = self
            .settings
            .get("calendarWeekNumbering")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        self.formatting.seed(FormattingSeed {
            format_locale: self
                .settings
                .get("formatLocale")
                .and_then(Value::as_locale)
                .cloned(),
            calendar_type,
            calendar_week_numbering,
            trailing_currency_code: self
                .settings
                .get("trailingCurrencyCode")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        });
    }

    fn list_setting(&self, name: &str) -> Vec<String> {
        self.settings
            .get(name)
            .and_then(Value::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    pub fn localization(&self) -> &dyn Localization {
        self.localization.as_ref()
    }

    pub fn formatting(&self) -> &dyn Formatting {
        self.formatting.as_ref()
    }

    pub fn loader(&self) -> &dyn ModuleLoader {
        self.loader.as_ref()
    }

    pub fn notifier_state(&self) -> NotifierState {
        self.notifier.state()
    }

    pub fn begin_batch(&mut self) {
        self.notifier.begin_batch();
    }

    pub fn end_batch(&mut self) {
        let event = self.notifier.end_batch();
        self.dispatch(event);
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent, &mut SettingsResolver) + Send + 'static,
    {
        self.next_listener_id += 1;
        let id = ListenerId(self.next_listener_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Forward every change event into a channel.
    pub fn subscribe_channel(&mut self) -> (ListenerId, Receiver<ChangeEvent>) {
        let (bus, receiver) = ChangeBus::new_pair();
        let id = self.subscribe(move |event, _| {
            bus.emit(event);
        });
        (id, receiver)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        if self.listeners.len() != before {
            return true;
        }
        if self.notifier.state() == NotifierState::Notifying {
            return self.removed_listeners.insert(id);
        }
        false
    }

    fn dispatch(&mut self, event: Option<ChangeEvent>) {
        let Some(mut event) = event else {
            return;
        };
        loop {
            self.notifier.begin_dispatch();
            let mut active = std::mem::take(&mut self.listeners);
            for (id, listener) in active.iter_mut() {
                if self.removed_listeners.contains(id) {
                    continue;
                }
                (listener)(&event, self);
            }
            // listeners subscribed during dispatch landed in self.listeners
            active.append(&mut self.listeners);
            let removed = std::mem::take(&mut self.removed_listeners);
            active.retain(|(id, _)| !removed.contains(id));
            self.listeners = active;

            match self.notifier.end_dispatch() {
                Some(follow_up) => event = follow_up,
                None => break,
            }
        }
    }
}

fn required_text(descriptor: &OptionDescriptor, raw: &RawValue) -> Result<String, ConfigError> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::unsupported(descriptor.name, "expected a string"))
}

fn optional_text(
    descriptor: &OptionDescriptor,
    raw: &RawValue,
) -> Result<Option<String>, ConfigError> {
    if raw.is_absent() {
        return Ok(None);
    }
    required_text(descriptor, raw).map(Some)
}
