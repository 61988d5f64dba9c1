//! Local store fallbacks

use bootconf::sources::{DisabledStore, KeyValueStore, PrebootConfig, SledStore};
use bootconf::{BootEnvironment, SettingsResolver};
use std::sync::Arc;
use tempfile::TempDir;

fn resolver_with_store(store: Arc<dyn KeyValueStore>) -> SettingsResolver {
    let mut resolver = SettingsResolver::new(BootEnvironment::default().with_storage(store));
    resolver.init().unwrap();
    resolver
}

#[test]
fn test_statistics_flag_read_from_persistent_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledStore::open(temp_dir.path().join("store")).unwrap());
    let resolver = resolver_with_store(store.clone());
    assert!(!resolver.statistics_enabled());

    store.set_item("sap-ui-statistics", "X").unwrap();
    assert!(resolver.statistics_enabled());

    store.remove_item("sap-ui-statistics").unwrap();
    assert!(!resolver.statistics_enabled());
}

#[test]
fn test_persistent_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");
    {
        let store = SledStore::open(&path).unwrap();
        store.set_item("sap-ui-statistics", "X").unwrap();
    }
    let resolver = resolver_with_store(Arc::new(SledStore::open(&path).unwrap()));
    assert!(resolver.statistics_enabled());
}

#[test]
fn test_disabled_store_counts_as_unset() {
    let resolver = resolver_with_store(Arc::new(DisabledStore));
    assert!(!resolver.statistics_enabled());
}

#[test]
fn test_statistics_option_wins_over_store() {
    let env = BootEnvironment::default()
        .with_preboot(PrebootConfig::new().with("statistics", true))
        .with_storage(Arc::new(DisabledStore));
    let mut resolver = SettingsResolver::new(env);
    resolver.init().unwrap();
    assert!(resolver.statistics_enabled());
}
