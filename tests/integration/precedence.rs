//! Source precedence and coercion through the public resolver API

use bootconf::schema::descriptors;
use bootconf::sources::PrebootConfig;
use bootconf::{SettingsResolver, Value};

use crate::integration::test_utils::{environment, initialized};

#[test]
fn test_every_option_defaults_without_overrides() {
    let resolver = initialized(PrebootConfig::new(), "");
    let detected = resolver.environment().detected.clone();
    for descriptor in descriptors() {
        let value = resolver.get(descriptor.name).unwrap();
        let expected = match descriptor.name {
            // derived from `animation` during init
            "animationMode" => Value::Str("full".to_string()),
            // an empty adaptation list collapses to "off"
            "xx-fiori2Adaptation" => Value::Bool(false),
            "frameOptions" => Value::Str("allow".to_string()),
            _ => descriptor.default_value(&detected),
        };
        assert_eq!(value, expected, "default of {}", descriptor.name);
    }
}

#[test]
fn test_list_results_are_copies() {
    let resolver = initialized(PrebootConfig::new(), "");
    let mut modules = resolver.modules();
    modules.push("my.app.Component".to_string());
    if let Value::List(mut items) = resolver.get("modules").unwrap() {
        items.push("other".to_string());
    }
    assert!(resolver.modules().is_empty());
    assert_eq!(resolver.get("modules").unwrap(), Value::List(Vec::new()));
}

#[test]
fn test_url_parameter_overrides_preboot_object() {
    let resolver = initialized(
        PrebootConfig::new().with("theme", "sap_fiori_3"),
        "sap-ui-theme=sap_horizon",
    );
    assert_eq!(resolver.theme(), "sap_horizon");
}

#[test]
fn test_preboot_object_overrides_meta_tag() {
    let env = environment(
        PrebootConfig::new().with("allowlistService", "/from/preboot"),
        "",
        &[("sap.allowlistService", "/from/meta")],
    );
    let mut resolver = SettingsResolver::new(env);
    resolver.init().unwrap();
    assert_eq!(resolver.allowlist_service().as_deref(), Some("/from/preboot"));
}

#[test]
fn test_meta_tag_used_when_nothing_else_is_set() {
    let env = environment(PrebootConfig::new(), "", &[("sap.allowlistService", "/from/meta")]);
    let mut resolver = SettingsResolver::new(env);
    resolver.init().unwrap();
    assert_eq!(resolver.allowlist_service().as_deref(), Some("/from/meta"));
}

#[test]
fn test_empty_url_parameter_resets_to_default() {
    let resolver = initialized(
        PrebootConfig::new().with("theme", "sap_fiori_3"),
        "sap-ui-theme=",
    );
    assert_eq!(resolver.theme(), "base");
}

#[test]
fn test_url_parameter_ignored_for_ineligible_option() {
    let resolver = initialized(PrebootConfig::new(), "sap-ui-noConflict=true");
    assert!(!resolver.no_conflict());
}

#[test]
fn test_url_parameters_ignored_on_request() {
    let resolver = initialized(
        PrebootConfig::new().with("ignoreUrlParams", true),
        "sap-ui-theme=sap_horizon&sap-ui-debug=true",
    );
    assert_eq!(resolver.theme(), "base");
    assert!(!resolver.debug());
}

#[test]
fn test_experimental_alias_in_url() {
    let resolver = initialized(PrebootConfig::new(), "sap-ui-xx-preload=async");
    assert_eq!(resolver.get("preload").unwrap(), Value::Str("async".to_string()));
}

#[test]
fn test_boolean_asymmetry() {
    let resolver = initialized(
        PrebootConfig::new()
            .with("accessibility", "anything-but-false")
            .with("debug", "yes"),
        "",
    );
    assert!(resolver.accessibility());
    assert!(!resolver.debug());

    let resolver = initialized(
        PrebootConfig::new()
            .with("accessibility", "FALSE")
            .with("debug", "X"),
        "",
    );
    assert!(!resolver.accessibility());
    assert!(resolver.debug());
}

#[test]
fn test_invalid_locale_falls_back_to_detected_language() {
    let resolver = initialized(PrebootConfig::new(), "sap-ui-language=not a locale!");
    assert_eq!(
        resolver.language_tag(),
        resolver.environment().detected.language
    );
}

#[test]
fn test_get_is_case_insensitive() {
    let resolver = initialized(PrebootConfig::new().with("theme", "sap_horizon"), "");
    assert_eq!(
        resolver.get("THEME").unwrap(),
        Value::Str("sap_horizon".to_string())
    );
    assert!(resolver.get("colour").is_err());
}
