//! Initialization protocol, derived values and re-evaluation

use bootconf::collab::ModuleLoader;
use bootconf::modes::{AnimationMode, SyncCallBehavior};
use bootconf::sources::{PrebootConfig, UrlParams};
use bootconf::{ConfigError, SettingsResolver, Value};

use crate::integration::test_utils::{environment, initialized, record_events};

#[test]
fn test_invalid_enum_value_keeps_previous_value() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    let err = resolver.set("calendarWeekNumbering", "MondayFirst").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    assert_eq!(
        resolver.get("calendarWeekNumbering").unwrap(),
        Value::Str("Default".to_string())
    );

    let err = resolver.set_animation_mode("sparkly").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    assert_eq!(resolver.animation_mode(), AnimationMode::Full);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_animation_mode_derived_from_animation_flag() {
    let resolver = initialized(PrebootConfig::new(), "");
    assert_eq!(resolver.animation_mode(), AnimationMode::Full);

    let resolver = initialized(PrebootConfig::new().with("animation", false), "");
    assert_eq!(resolver.animation_mode(), AnimationMode::Minimal);
    assert_eq!(
        resolver.get("animationMode").unwrap(),
        Value::Str("minimal".to_string())
    );
}

#[test]
fn test_explicit_animation_mode_wins_over_flag() {
    let resolver = initialized(
        PrebootConfig::new()
            .with("animation", false)
            .with("animationMode", "basic"),
        "",
    );
    assert_eq!(resolver.animation_mode(), AnimationMode::Basic);
    assert!(resolver.animation());
}

#[test]
fn test_invalid_animation_mode_fails_init() {
    let mut resolver = SettingsResolver::new(environment(
        PrebootConfig::new(),
        "sap-ui-animationMode=sparkly",
        &[],
    ));
    let err = resolver.init().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    assert!(!resolver.is_initialized());
}

#[test]
fn test_second_init_changes_nothing() {
    let mut resolver = initialized(
        PrebootConfig::new().with("theme", "sap_horizon"),
        "sap-ui-debug=true",
    );
    let before = resolver.snapshot();
    let events = record_events(&mut resolver);

    resolver.init().unwrap();

    assert_eq!(resolver.snapshot(), before);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_reevaluate_with_same_inputs_is_silent() {
    let mut resolver = initialized(PrebootConfig::new().with("theme", "sap_horizon"), "");
    let events = record_events(&mut resolver);
    let env = resolver.environment().clone();

    resolver.reevaluate(env).unwrap();

    assert!(events.lock().unwrap().is_empty());
    assert_eq!(resolver.theme(), "sap_horizon");
}

#[test]
fn test_reevaluate_reports_differences_once() {
    let mut resolver = initialized(PrebootConfig::new().with("theme", "sap_horizon"), "");
    let events = record_events(&mut resolver);
    let env = resolver
        .environment()
        .clone()
        .with_url(UrlParams::from_query("sap-ui-theme=sap_fiori_3&sap-ui-debug=x"));

    resolver.reevaluate(env).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("theme"), Some(&Value::Str("sap_fiori_3".to_string())));
    assert_eq!(events[0].get("debug"), Some(&Value::Bool(true)));
    assert_eq!(resolver.theme(), "sap_fiori_3");
}

#[test]
fn test_setter_values_survive_reevaluation() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    resolver.set("theme", "from_setter").unwrap();
    let env = resolver
        .environment()
        .clone()
        .with_url(UrlParams::from_query("sap-ui-theme=from_url"));

    resolver.reevaluate(env).unwrap();

    assert_eq!(resolver.theme(), "from_setter");
}

#[test]
fn test_get_before_init_reads_sources() {
    let resolver = SettingsResolver::new(environment(
        PrebootConfig::new().with("theme", "sap_fiori_3"),
        "sap-ui-debug=true",
        &[],
    ));
    assert!(!resolver.is_initialized());
    assert_eq!(resolver.theme(), "sap_fiori_3");
    assert!(resolver.debug());
    assert!(resolver.accessibility());
}

#[test]
fn test_setter_before_init_survives_init() {
    let mut resolver = SettingsResolver::new(environment(
        PrebootConfig::new().with("theme", "sap_fiori_3"),
        "",
        &[],
    ));
    resolver.set("theme", "sap_horizon").unwrap();
    resolver.init().unwrap();
    assert_eq!(resolver.theme(), "sap_horizon");
}

#[test]
fn test_animation_flag_set_before_init_derives_mode() {
    let mut resolver = SettingsResolver::new(environment(PrebootConfig::new(), "", &[]));
    resolver.set("animation", false).unwrap();
    resolver.init().unwrap();

    assert!(!resolver.animation());
    assert_eq!(resolver.animation_mode(), AnimationMode::Minimal);
    assert_eq!(
        resolver.get("animationMode").unwrap(),
        Value::Str("minimal".to_string())
    );
}

#[test]
fn test_animation_mode_set_before_init_realigns_flag() {
    let mut resolver = SettingsResolver::new(environment(
        PrebootConfig::new().with("animation", false),
        "",
        &[],
    ));
    resolver.set_animation_mode("basic").unwrap();
    resolver.init().unwrap();

    assert_eq!(resolver.animation_mode(), AnimationMode::Basic);
    assert!(resolver.animation());
}

#[test]
fn test_ignore_url_params_set_before_init_skips_url() {
    let mut resolver = SettingsResolver::new(environment(
        PrebootConfig::new().with("theme", "sap_fiori_3"),
        "sap-ui-theme=sap_horizon&sap-ui-debug=true",
        &[],
    ));
    resolver.set("ignoreUrlParams", true).unwrap();
    resolver.init().unwrap();

    assert_eq!(resolver.theme(), "sap_fiori_3");
    assert!(!resolver.debug());
}

#[test]
fn test_animation_flag_setter_survives_reevaluation() {
    let mut resolver = SettingsResolver::new(environment(PrebootConfig::new(), "", &[]));
    resolver.set("animation", false).unwrap();
    resolver.init().unwrap();
    let events = record_events(&mut resolver);
    let env = resolver.environment().clone();

    resolver.reevaluate(env).unwrap();

    assert!(events.lock().unwrap().is_empty());
    assert_eq!(resolver.animation_mode(), AnimationMode::Minimal);
}

#[test]
fn test_library_shorthand_prepends_modules() {
    let resolver = initialized(
        PrebootConfig::new()
            .with("libs", "sap.m, sap.ui.layout")
            .with("modules", "my.app.main"),
        "",
    );
    assert_eq!(
        resolver.modules(),
        vec![
            "sap.m.library".to_string(),
            "sap.ui.layout.library".to_string(),
            "my.app.main".to_string()
        ]
    );
}

#[test]
fn test_sap_language_parameter() {
    let resolver = initialized(PrebootConfig::new(), "sap-language=ZH");
    assert_eq!(resolver.language_tag().language(), "zh");
    assert_eq!(resolver.language_tag().script(), Some("Hans"));
    assert_eq!(resolver.sap_logon_language(), "ZH");
}

#[test]
fn test_nosync_reaches_module_loader() {
    let resolver = initialized(PrebootConfig::new().with("xx-nosync", "warn"), "");
    assert_eq!(resolver.loader().report_sync_calls(), SyncCallBehavior::Warn);
    assert_eq!(resolver.sync_call_behavior(), SyncCallBehavior::Warn);

    let resolver = initialized(PrebootConfig::new(), "sap-ui-xx-nosync=x");
    assert_eq!(resolver.loader().report_sync_calls(), SyncCallBehavior::Error);
}

#[test]
fn test_custom_flexibility_services_load_fl_library() {
    let resolver = initialized(
        PrebootConfig::new().with("flexibilityServices", "/custom/lrep"),
        "",
    );
    assert!(resolver.modules().contains(&"sap.ui.fl.library".to_string()));

    let resolver = initialized(
        PrebootConfig::new()
            .with("flexibilityServices", "/custom/lrep")
            .with("xx-skipAutomaticFlLibLoading", true),
        "",
    );
    assert!(resolver.modules().is_empty());
}
