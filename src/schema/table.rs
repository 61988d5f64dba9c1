use super::{DefaultValue as D, OptionDescriptor as O, OptionType as T};
use super::{ANIMATION_MODE_TYPE, CALENDAR_WEEK_NUMBERING_TYPE};

const URL: bool = true;
const NO_URL: bool = false;

/// Recognized options in declaration order.
pub static OPTIONS: &[O] = &[
    O::new("theme", T::String, D::Str("base"), URL),
    O::new("language", T::Locale, D::DetectedLanguage, URL),
    O::new("timezone", T::String, D::LocalTimezone, URL),
    O::new("formatLocale", T::Locale, D::Unset, URL),
    O::new("calendarType", T::String, D::Unset, URL),
    O::new("calendarWeekNumbering", CALENDAR_WEEK_NUMBERING_TYPE, D::Str("Default"), URL),
    O::new("trailingCurrencyCode", T::Boolean, D::Bool(true), URL),
    O::new("accessibility", T::Boolean, D::Bool(true), URL),
    O::new("autoAriaBodyRole", T::Boolean, D::Bool(false), NO_URL),
    O::new("animation", T::Boolean, D::Bool(true), URL),
    O::new("animationMode", ANIMATION_MODE_TYPE, D::Unset, URL),
    O::new("rtl", T::Boolean, D::Unset, URL),
    O::new("debug", T::Boolean, D::Bool(false), URL),
    O::new("inspect", T::Boolean, D::Bool(false), URL),
    O::new("originInfo", T::Boolean, D::Bool(false), URL),
    O::new("noConflict", T::Boolean, D::Bool(false), NO_URL),
    O::new("noDuplicateIds", T::Boolean, D::Bool(true), URL),
    O::new("trace", T::Boolean, D::Bool(false), NO_URL),
    O::new("modules", T::StringList, D::EmptyList, NO_URL),
    O::new("areas", T::StringList, D::Unset, NO_URL),
    O::new("onInit", T::Code, D::Unset, NO_URL),
    O::new("uidPrefix", T::String, D::Str("__"), NO_URL),
    O::new("ignoreUrlParams", T::Boolean, D::Bool(false), NO_URL),
    O::new("preload", T::String, D::Str("auto"), URL),
    O::new("rootComponent", T::String, D::Str(""), NO_URL),
    O::new("preloadLibCss", T::StringList, D::EmptyList, URL),
    O::new("application", T::String, D::Str(""), URL),
    O::new("appCacheBuster", T::StringList, D::EmptyList, URL),
    O::new("bindingSyntax", T::String, D::Str("default"), NO_URL),
    O::new("versionedLibCss", T::Boolean, D::Bool(false), URL),
    O::new("manifestFirst", T::Boolean, D::Bool(false), URL),
    O::new("flexibilityServices", T::String, D::Str("/sap/bc/lrep"), URL),
    O::new("whitelistService", T::String, D::Unset, NO_URL),
    O::new("allowlistService", T::String, D::Unset, NO_URL),
    O::new("frameOptions", T::String, D::Str("default"), NO_URL),
    O::new("frameOptionsConfig", T::Object, D::Unset, NO_URL),
    O::new("support", T::StringList, D::Unset, URL),
    O::new("testRecorder", T::StringList, D::Unset, URL),
    O::new("activeTerminologies", T::StringList, D::Unset, URL),
    O::new("fileShareSupport", T::String, D::Unset, NO_URL),
    O::new("securityTokenHandlers", T::FunctionList, D::EmptyList, NO_URL),
    O::new("productive", T::Boolean, D::Bool(false), NO_URL),
    O::new("themeRoots", T::Object, D::EmptyObject, NO_URL),
    O::new("xx-placeholder", T::Boolean, D::Bool(true), URL),
    O::new("xx-rootComponentNode", T::String, D::Str(""), NO_URL),
    O::new("xx-appCacheBusterMode", T::String, D::Str("sync"), URL),
    O::new("xx-appCacheBusterHooks", T::Object, D::Unset, NO_URL),
    O::new("xx-disableCustomizing", T::Boolean, D::Bool(false), NO_URL),
    O::new("xx-viewCache", T::Boolean, D::Bool(true), URL),
    O::new("xx-depCache", T::Boolean, D::Bool(false), URL),
    O::new("xx-libraryPreloadFiles", T::StringList, D::EmptyList, URL),
    O::new("xx-componentPreload", T::String, D::Str(""), URL),
    O::new("xx-designMode", T::Boolean, D::Bool(false), URL),
    O::new("xx-supportedLanguages", T::StringList, D::EmptyList, URL),
    O::new("xx-bootTask", T::Function, D::Unset, NO_URL),
    O::new("xx-suppressDeactivationOfControllerCode", T::Boolean, D::Bool(false), URL),
    O::new("xx-lesssupport", T::Boolean, D::Bool(false), URL),
    O::new("xx-handleValidation", T::Boolean, D::Bool(false), URL),
    O::new("xx-fiori2Adaptation", T::StringList, D::EmptyList, URL),
    O::new("xx-cache-use", T::Boolean, D::Bool(true), URL),
    O::new("xx-cache-excludedKeys", T::StringList, D::EmptyList, URL),
    O::new("xx-cache-serialization", T::Boolean, D::Bool(false), URL),
    O::new("xx-nosync", T::String, D::Str(""), URL),
    O::new("xx-waitForTheme", T::String, D::Str(""), URL),
    O::new("xx-hyphenation", T::String, D::Str(""), URL),
    O::new("xx-flexBundleRequestForced", T::Boolean, D::Bool(false), URL),
    O::new("xx-skipAutomaticFlLibLoading", T::Boolean, D::Bool(false), URL),
    O::new("xx-cssVariables", T::String, D::Str("false"), URL),
    O::new("xx-debugModuleLoading", T::Boolean, D::Bool(false), URL),
    O::new("statistics", T::Boolean, D::Bool(false), URL),
    O::new("xx-acc-keys", T::Boolean, D::Bool(false), URL),
    O::new("xx-measure-cards", T::Boolean, D::Bool(false), URL),
];
