//! Change notification: batching, follow-up events and subscriptions

use bootconf::notify::NotifierState;
use bootconf::sources::PrebootConfig;
use bootconf::{RawValue, Value};
use std::sync::{Arc, Mutex};

use crate::integration::test_utils::{initialized, record_events};

#[test]
fn test_apply_many_fires_one_event() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    resolver
        .apply_many(vec![
            ("theme", RawValue::from("sap_horizon")),
            ("debug", RawValue::from(true)),
        ])
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("theme"), Some(&Value::Str("sap_horizon".to_string())));
    assert_eq!(events[0].get("debug"), Some(&Value::Bool(true)));
}

#[test]
fn test_nested_batches_fire_once_for_outer_scope() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    resolver.begin_batch();
    resolver.set("theme", "sap_horizon").unwrap();
    resolver.begin_batch();
    resolver.set("debug", true).unwrap();
    assert_eq!(resolver.notifier_state(), NotifierState::Batching(2));
    resolver.end_batch();
    assert!(events.lock().unwrap().is_empty());
    resolver.end_batch();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].changes.len(), 2);
    assert_eq!(resolver.notifier_state(), NotifierState::Idle);
}

#[test]
fn test_last_write_wins_within_batch() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    resolver.begin_batch();
    resolver.set("theme", "first").unwrap();
    resolver.set("theme", "second").unwrap();
    resolver.end_batch();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("theme"), Some(&Value::Str("second".to_string())));
}

#[test]
fn test_unchanged_value_fires_nothing() {
    let mut resolver = initialized(PrebootConfig::new().with("theme", "sap_horizon"), "");
    let events = record_events(&mut resolver);
    resolver.set("theme", "sap_horizon").unwrap();
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_listener_changes_arrive_as_follow_up_event() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    resolver.subscribe(|event, resolver| {
        if event.contains("theme") {
            resolver.set("debug", true).unwrap();
        }
    });
    let events = record_events(&mut resolver);

    resolver.set("theme", "sap_horizon").unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("theme"));
    assert!(!events[0].contains("debug"));
    assert_eq!(events[1].get("debug"), Some(&Value::Bool(true)));
}

#[test]
fn test_language_change_reports_direction_flip() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    resolver.set_language("he").unwrap();

    assert_eq!(resolver.language(), "he");
    assert!(resolver.rtl());
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("language"));
    assert_eq!(events[0].get("rtl"), Some(&Value::Bool(true)));
}

#[test]
fn test_animation_mode_updates_animation_flag_in_one_event() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let events = record_events(&mut resolver);

    resolver.set_animation_mode("none").unwrap();

    assert!(!resolver.animation());
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("animation"), Some(&Value::Bool(false)));
    assert_eq!(events[0].get("animationMode"), Some(&Value::Str("none".to_string())));
}

#[test]
fn test_unsubscribed_listener_is_silent() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let count = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&count);
    let id = resolver.subscribe(move |_, _| {
        *counter.lock().unwrap() += 1;
    });

    resolver.set("theme", "a").unwrap();
    assert!(resolver.unsubscribe(id));
    resolver.set("theme", "b").unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
    assert!(!resolver.unsubscribe(id));
}

#[test]
fn test_channel_subscription_receives_events() {
    let mut resolver = initialized(PrebootConfig::new(), "");
    let (_id, receiver) = resolver.subscribe_channel();

    resolver.set("uidPrefix", "ui5-").unwrap();

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.get("uidPrefix"), Some(&Value::Str("ui5-".to_string())));
    assert!(receiver.try_recv().is_err());
}
