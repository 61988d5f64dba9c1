//! Shared test utilities for integration tests

use bootconf::sources::{MetaTags, PrebootConfig, UrlParams};
use bootconf::{BootEnvironment, ChangeEvent, SettingsResolver};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Serializes tests that touch process-wide environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment built from a pre-boot object, a query string and meta tags.
pub fn environment(preboot: PrebootConfig, query: &str, meta: &[(&str, &str)]) -> BootEnvironment {
    BootEnvironment::default()
        .with_preboot(preboot)
        .with_url(UrlParams::from_query(query))
        .with_meta(MetaTags::from_pairs(meta.iter().copied()))
}

/// Initialized resolver over the given inputs.
pub fn initialized(preboot: PrebootConfig, query: &str) -> SettingsResolver {
    let mut resolver = SettingsResolver::new(environment(preboot, query, &[]));
    resolver.init().unwrap();
    resolver
}

/// Subscribe a listener that records every event it receives.
pub fn record_events(resolver: &mut SettingsResolver) -> Arc<Mutex<Vec<ChangeEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    resolver.subscribe(move |event, _| {
        sink.lock().unwrap().push(event.clone());
    });
    events
}

/// Run `f` with `XDG_CONFIG_HOME` pointing into `test_dir` and `BOOTCONF_*`
/// variables cleared, restoring the environment afterwards.
pub fn with_config_home<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut keys: Vec<String> = vec!["XDG_CONFIG_HOME".to_string()];
    keys.extend(vars.iter().map(|(key, _)| key.to_string()));
    let saved: Vec<(String, Option<String>)> = keys
        .iter()
        .map(|key| (key.clone(), std::env::var(key).ok()))
        .collect();

    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().join("config"));
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(&key, v),
            None => std::env::remove_var(&key),
        }
    }
    result
}
