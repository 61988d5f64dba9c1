//! Typed getters and the remaining dedicated setters.

use super::bootstrap::{collapse_fiori2, sync_call_behavior};
use super::SettingsResolver;
use crate::collab::LANGUAGES_DELIVERED_WITH_CORE;
use crate::compat::{self, Version};
use crate::error::ConfigError;
use crate::locale::LanguageTag;
use crate::modes::{
    AnimationMode, CalendarType, CalendarWeekNumbering, Fiori2Adaptation, FrameOptions,
    SyncCallBehavior,
};
use crate::schema::describe;
use crate::value::{Callback, RawValue, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

const STATISTICS_STORAGE_KEY: &str = "sap-ui-statistics";

/// One connector entry of the flexibility services configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibilityService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_connector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connector: Option<String>,
    #[serde(default)]
    pub custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl FlexibilityService {
    /// The layered repository connector serving every layer from `url`.
    pub fn lrep(url: impl Into<String>) -> Self {
        Self {
            connector: Some("LrepConnector".to_string()),
            apply_connector: None,
            write_connector: None,
            custom: false,
            url: Some(url.into()),
            path: None,
            layers: vec!["ALL".to_string()],
        }
    }
}

/// Legacy format settings bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSettings {
    pub first_day_of_week: Option<u8>,
    pub legacy_date_format: Option<String>,
    pub trailing_currency_code: bool,
}

impl SettingsResolver {
    fn value_of(&self, name: &'static str) -> Value {
        match describe(name) {
            Ok(descriptor) => self.current(descriptor),
            Err(_) => Value::Unset,
        }
    }

    fn flag(&self, name: &'static str) -> bool {
        self.value_of(name).as_bool().unwrap_or(false)
    }

    fn text(&self, name: &'static str) -> String {
        match self.value_of(name) {
            Value::Str(s) => s,
            Value::Unset => String::new(),
            other => other.to_string(),
        }
    }

    fn optional_text(&self, name: &'static str) -> Option<String> {
        Some(self.text(name)).filter(|s| !s.is_empty())
    }

    fn list(&self, name: &'static str) -> Vec<String> {
        match self.value_of(name) {
            Value::List(items) => items,
            _ => Vec::new(),
        }
    }

    fn optional_list(&self, name: &'static str) -> Option<Vec<String>> {
        match self.value_of(name) {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn theme(&self) -> String {
        self.text("theme")
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<(), ConfigError> {
        self.set("theme", theme)
    }

    /// The language as configured.
    pub fn language(&self) -> String {
        self.language_tag().as_configured().to_string()
    }

    pub fn language_tag(&self) -> LanguageTag {
        if self.initialized {
            return self.localization.language().clone();
        }
        match self.value_of("language") {
            Value::Locale(tag) => tag,
            _ => self.env.detected.language.clone(),
        }
    }

    pub fn sap_logon_language(&self) -> String {
        if self.initialized {
            return self.localization.sap_logon_language();
        }
        self.sap_logon_language
            .clone()
            .unwrap_or_else(|| self.language_tag().sap_logon_language())
    }

    pub fn timezone(&self) -> String {
        if self.initialized {
            return self.localization.timezone().to_string();
        }
        self.text("timezone")
    }

    pub fn rtl(&self) -> bool {
        if self.initialized {
            return self.localization.rtl();
        }
        self.value_of("rtl")
            .as_bool()
            .unwrap_or_else(|| self.language_tag().is_rtl())
    }

    pub fn supported_languages(&self) -> Vec<String> {
        if self.initialized {
            return self.localization.supported_languages();
        }
        self.list("xx-supportedLanguages")
    }

    pub fn languages_delivered_with_core(&self) -> Vec<String> {
        LANGUAGES_DELIVERED_WITH_CORE
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Explicit format locale, else the language.
    pub fn format_locale(&self) -> LanguageTag {
        let explicit = if self.initialized {
            self.formatting.format_locale().cloned()
        } else {
            self.value_of("formatLocale").as_locale().cloned()
        };
        explicit.unwrap_or_else(|| self.language_tag())
    }

    /// Explicit calendar, else one implied by the legacy date format, else
    /// Gregorian.
    pub fn calendar_type(&self) -> CalendarType {
        if self.initialized {
            return self
                .formatting
                .calendar_type()
                .unwrap_or(CalendarType::Gregorian);
        }
        self.optional_text("calendarType")
            .and_then(|s| s.parse().ok())
            .unwrap_or(CalendarType::Gregorian)
    }

    pub fn calendar_week_numbering(&self) -> CalendarWeekNumbering {
        if self.initialized {
            return self.formatting.calendar_week_numbering();
        }
        self.text("calendarWeekNumbering").parse().unwrap_or_default()
    }

    pub fn format_settings(&self) -> FormatSettings {
        FormatSettings {
            first_day_of_week: self.formatting.first_day_of_week(),
            legacy_date_format: self.formatting.legacy_date_format().map(str::to_string),
            trailing_currency_code: if self.initialized {
                self.formatting.trailing_currency_code()
            } else {
                self.value_of("trailingCurrencyCode").as_bool().unwrap_or(true)
            },
        }
    }

    pub fn accessibility(&self) -> bool {
        self.flag("accessibility")
    }

    pub fn auto_aria_body_role(&self) -> bool {
        self.flag("autoAriaBodyRole")
    }

    pub fn animation(&self) -> bool {
        self.flag("animation")
    }

    /// Resolved animation mode; before `init` an unset mode is derived from
    /// the `animation` flag.
    pub fn animation_mode(&self) -> AnimationMode {
        match self.optional_text("animationMode").map(|s| s.parse::<AnimationMode>()) {
            Some(Ok(mode)) => mode,
            _ if self.animation() => AnimationMode::Full,
            _ => AnimationMode::Minimal,
        }
    }

    pub fn fiori2_adaptation(&self) -> Fiori2Adaptation {
        match collapse_fiori2(&self.value_of("xx-fiori2Adaptation")) {
            Value::Bool(true) => Fiori2Adaptation::Full,
            Value::List(items) => Fiori2Adaptation::Partial(items),
            _ => Fiori2Adaptation::Off,
        }
    }

    pub fn debug(&self) -> bool {
        self.flag("debug")
    }

    pub fn inspect(&self) -> bool {
        self.flag("inspect")
    }

    pub fn origin_info(&self) -> bool {
        self.flag("originInfo")
    }

    pub fn no_conflict(&self) -> bool {
        self.flag("noConflict")
    }

    pub fn no_duplicate_ids(&self) -> bool {
        self.flag("noDuplicateIds")
    }

    pub fn trace(&self) -> bool {
        self.flag("trace")
    }

    pub fn productive(&self) -> bool {
        self.flag("productive")
    }

    pub fn modules(&self) -> Vec<String> {
        self.list("modules")
    }

    pub fn areas(&self) -> Option<Vec<String>> {
        self.optional_list("areas")
    }

    pub fn on_init(&self) -> Option<Value> {
        Some(self.value_of("onInit")).filter(|v| !v.is_unset())
    }

    pub fn uid_prefix(&self) -> String {
        self.text("uidPrefix")
    }

    pub fn design_mode(&self) -> bool {
        self.flag("xx-designMode")
    }

    pub fn suppress_deactivation_of_controller_code(&self) -> bool {
        self.flag("xx-suppressDeactivationOfControllerCode")
    }

    /// Controller code is deactivated in design mode unless suppressed.
    pub fn controller_code_deactivated(&self) -> bool {
        self.design_mode() && !self.suppress_deactivation_of_controller_code()
    }

    pub fn application(&self) -> String {
        self.text("application")
    }

    pub fn root_component(&self) -> String {
        self.text("rootComponent")
    }

    pub fn app_cache_buster(&self) -> Vec<String> {
        self.list("appCacheBuster")
    }

    pub fn app_cache_buster_mode(&self) -> String {
        self.text("xx-appCacheBusterMode")
    }

    pub fn app_cache_buster_hooks(&self) -> Option<Map<String, JsonValue>> {
        self.value_of("xx-appCacheBusterHooks").as_object().cloned()
    }

    pub fn disable_customizing(&self) -> bool {
        self.flag("xx-disableCustomizing")
    }

    pub fn view_cache(&self) -> bool {
        self.flag("xx-viewCache")
    }

    pub fn placeholder(&self) -> bool {
        self.flag("xx-placeholder")
    }

    pub fn theme_roots(&self) -> Map<String, JsonValue> {
        self.value_of("themeRoots")
            .as_object()
            .cloned()
            .unwrap_or_default()
    }

    pub fn preload_lib_css(&self) -> Vec<String> {
        self.list("preloadLibCss")
    }

    pub fn versioned_lib_css(&self) -> bool {
        self.flag("versionedLibCss")
    }

    pub fn library_preload_files(&self) -> Vec<String> {
        self.list("xx-libraryPreloadFiles")
    }

    /// Preload mode. Off in debug mode; `auto` picks `async` or `sync` by
    /// loader mode for optimized sources and is off otherwise.
    pub fn preload(&self) -> String {
        if self.debug() {
            return String::new();
        }
        let mode = self.text("preload");
        if mode != "auto" {
            return mode;
        }
        if !self.env.optimized {
            return String::new();
        }
        let mode = if self.loader.is_async() { "async" } else { "sync" };
        mode.to_string()
    }

    pub fn component_preload(&self) -> String {
        self.optional_text("xx-componentPreload")
            .unwrap_or_else(|| self.preload())
    }

    pub fn sync_call_behavior(&self) -> SyncCallBehavior {
        sync_call_behavior(Some(&self.value_of("xx-nosync")))
    }

    pub fn dep_cache(&self) -> bool {
        self.flag("xx-depCache")
    }

    pub fn manifest_first(&self) -> bool {
        self.flag("manifestFirst")
    }

    /// A value starting with `/` is the URL of the layered repository;
    /// anything else is a JSON array of connector entries.
    pub fn flexibility_services(&self) -> Result<Vec<FlexibilityService>, ConfigError> {
        let raw = self.text("flexibilityServices");
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        if raw.starts_with('/') {
            return Ok(vec![FlexibilityService::lrep(raw)]);
        }
        serde_json::from_str(&raw)
            .map_err(|e| ConfigError::unsupported("flexibilityServices", e.to_string()))
    }

    pub fn set_flexibility_services(
        &mut self,
        services: &[FlexibilityService],
    ) -> Result<(), ConfigError> {
        let encoded = serde_json::to_string(services)
            .map_err(|e| ConfigError::InvalidArgument(e.to_string()))?;
        self.set("flexibilityServices", encoded)
    }

    pub fn flex_bundle_request_forced(&self) -> bool {
        self.flag("xx-flexBundleRequestForced")
    }

    pub fn frame_options(&self) -> FrameOptions {
        FrameOptions::from_lenient(&self.text("frameOptions"))
    }

    pub fn frame_options_config(&self) -> Option<Map<String, JsonValue>> {
        self.value_of("frameOptionsConfig").as_object().cloned()
    }

    pub fn allowlist_service(&self) -> Option<String> {
        self.optional_text("allowlistService")
    }

    pub fn whitelist_service(&self) -> Option<String> {
        self.optional_text("whitelistService")
    }

    pub fn file_share_support(&self) -> Option<String> {
        self.optional_text("fileShareSupport")
    }

    pub fn support_mode(&self) -> Option<Vec<String>> {
        self.optional_list("support")
    }

    pub fn test_recorder_mode(&self) -> Option<Vec<String>> {
        self.optional_list("testRecorder")
    }

    /// The `statistics` option, or the `sap-ui-statistics` flag in the local
    /// store. Store failures count as "not set".
    pub fn statistics_enabled(&self) -> bool {
        if self.flag("statistics") {
            return true;
        }
        match self.env.storage.get_item(STATISTICS_STORAGE_KEY) {
            Ok(value) => value.as_deref() == Some("X"),
            Err(e) => {
                debug!(error = %e, "Local store unavailable for statistics flag");
                false
            }
        }
    }

    pub fn handle_validation(&self) -> bool {
        self.flag("xx-handleValidation")
    }

    pub fn hyphenation(&self) -> String {
        self.text("xx-hyphenation")
    }

    pub fn wait_for_theme(&self) -> String {
        self.text("xx-waitForTheme")
    }

    pub fn css_variables(&self) -> String {
        self.text("xx-cssVariables")
    }

    pub fn less_support(&self) -> bool {
        self.flag("xx-lesssupport")
    }

    pub fn debug_module_loading(&self) -> bool {
        self.flag("xx-debugModuleLoading")
    }

    pub fn acc_keys(&self) -> bool {
        self.flag("xx-acc-keys")
    }

    pub fn measure_cards(&self) -> bool {
        self.flag("xx-measure-cards")
    }

    pub fn active_terminologies(&self) -> Option<Vec<String>> {
        self.optional_list("activeTerminologies")
    }

    pub fn security_token_handlers(&self) -> Vec<Callback> {
        match self.value_of("securityTokenHandlers") {
            Value::Functions(handlers) => handlers,
            _ => Vec::new(),
        }
    }

    pub fn set_security_token_handlers(&mut self, handlers: Vec<Callback>) -> Result<(), ConfigError> {
        self.set("securityTokenHandlers", RawValue::Functions(handlers))
    }

    /// `default` resolves through the `sapCoreBindingSyntax` compatibility
    /// version: below 1.26 is `simple`, otherwise `complex`.
    pub fn binding_syntax(&self) -> String {
        let syntax = self.text("bindingSyntax");
        if syntax != "default" {
            return syntax;
        }
        let version = self.compatibility_version(Some("sapCoreBindingSyntax"));
        if version < Version::new(1, 26, 0) {
            "simple".to_string()
        } else {
            "complex".to_string()
        }
    }

    pub fn ui5_cache_on(&self) -> bool {
        self.flag("xx-cache-use")
    }

    pub fn set_ui5_cache_on(&mut self, on: bool) -> Result<(), ConfigError> {
        self.set("xx-cache-use", on)
    }

    pub fn ui5_cache_serialization(&self) -> bool {
        self.flag("xx-cache-serialization")
    }

    pub fn ui5_cache_excluded_keys(&self) -> Vec<String> {
        self.list("xx-cache-excludedKeys")
    }

    /// Compatibility version for `feature`, or the global default.
    pub fn compatibility_version(&self, feature: Option<&str>) -> Version {
        let use_url = !self.flag("ignoreUrlParams");
        let lookup = |key: &str| {
            if use_url {
                if let Some(value) = self.env.url.early_lookup(key) {
                    return Some(value.to_string());
                }
            }
            self.env.preboot.get(key).map(RawValue::stringify)
        };
        compat::compatibility_version(lookup, feature)
    }

    pub fn version(&self) -> Version {
        compat::runtime_version()
    }
}
