//! Property-based tests for precedence, enum validation and idempotence

use bootconf::modes::ANIMATION_MODES;
use bootconf::sources::{PrebootConfig, UrlParams};
use bootconf::{BootEnvironment, ConfigError, SettingsResolver};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn initialized(preboot: PrebootConfig, query: &str) -> SettingsResolver {
    let env = BootEnvironment::default()
        .with_preboot(preboot)
        .with_url(UrlParams::from_query(query));
    let mut resolver = SettingsResolver::new(env);
    resolver.init().unwrap();
    resolver
}

/// A URL parameter beats the pre-boot object; an empty one resets to the default
#[test]
fn test_url_precedence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&("[a-z_]{1,12}", "[a-z_]{1,12}"), |(preboot_theme, url_theme)| {
            let preboot = PrebootConfig::new().with("theme", preboot_theme.as_str());

            let resolver = initialized(preboot.clone(), &format!("sap-ui-theme={}", url_theme));
            prop_assert_eq!(resolver.theme(), url_theme);

            let resolver = initialized(preboot.clone(), "sap-ui-theme=");
            prop_assert_eq!(resolver.theme(), "base");

            let resolver = initialized(preboot, "");
            prop_assert_eq!(resolver.theme(), preboot_theme);
            Ok(())
        })
        .unwrap();
}

/// Values outside the animation mode enumeration are rejected and change nothing
#[test]
fn test_animation_mode_validation_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z]{0,8}", |mode| {
            prop_assume!(!ANIMATION_MODES.contains(&mode.as_str()));
            let mut resolver = initialized(PrebootConfig::new(), "");
            let result = resolver.set_animation_mode(&mode);
            let rejected = matches!(result, Err(ConfigError::InvalidEnumValue { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(resolver.animation_mode().as_str(), "full");
            prop_assert!(resolver.animation());
            Ok(())
        })
        .unwrap();
}

/// Re-evaluating unchanged inputs fires no notification
#[test]
fn test_reevaluation_idempotence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("[a-z_]{1,12}", any::<bool>(), any::<bool>()),
            |(theme, debug, animation)| {
                let preboot = PrebootConfig::new()
                    .with("theme", theme.as_str())
                    .with("animation", animation);
                let query = format!("sap-ui-debug={}", debug);
                let mut resolver = initialized(preboot, &query);
                let before = resolver.snapshot();

                let fired = Arc::new(Mutex::new(0usize));
                let counter = Arc::clone(&fired);
                resolver.subscribe(move |_, _| {
                    *counter.lock().unwrap() += 1;
                });

                resolver.init().unwrap();
                let env = resolver.environment().clone();
                resolver.reevaluate(env).unwrap();

                prop_assert_eq!(*fired.lock().unwrap(), 0);
                prop_assert_eq!(resolver.snapshot(), before);
                Ok(())
            },
        )
        .unwrap();
}
