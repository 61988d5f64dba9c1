//! Property-based tests for type coercion

use bootconf::coerce::{coerce, split_list};
use bootconf::locale::DetectedDefaults;
use bootconf::schema::describe;
use bootconf::{RawValue, Value};
use proptest::prelude::*;

/// Options defaulting to `true` only switch off on a literal "false"
#[test]
fn test_default_true_boolean_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let descriptor = describe("accessibility").unwrap();
    let detected = DetectedDefaults::default();

    runner
        .run(&any::<String>(), |input| {
            let value = coerce(descriptor, &RawValue::from(input.as_str()), &detected).unwrap();
            let expected = input.to_lowercase() != "false";
            prop_assert_eq!(value, Value::Bool(expected));
            Ok(())
        })
        .unwrap();
}

/// Options defaulting to `false` only switch on for "true" or "x"
#[test]
fn test_default_false_boolean_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let descriptor = describe("debug").unwrap();
    let detected = DetectedDefaults::default();

    runner
        .run(&"[a-zA-Z]{0,5}", |input| {
            let value = coerce(descriptor, &RawValue::from(input.as_str()), &detected).unwrap();
            let lower = input.to_lowercase();
            let expected = lower == "true" || lower == "x";
            prop_assert_eq!(value, Value::Bool(expected));
            Ok(())
        })
        .unwrap();
}

/// Splitting yields one element per separator plus one, none containing a separator
#[test]
fn test_split_list_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z.; ,]{0,24}", |input| {
            let parts = split_list(&input);
            let separators = input.chars().filter(|c| matches!(c, ' ' | ',' | ';')).count();
            prop_assert_eq!(parts.len(), separators + 1);
            for part in &parts {
                prop_assert!(!part.contains([' ', ',', ';']));
            }
            Ok(())
        })
        .unwrap();
}

/// Coercion is pure: the same input always yields the same value
#[test]
fn test_coercion_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let detected = DetectedDefaults::default();
    let names = ["theme", "modules", "debug", "language", "animationMode", "uidPrefix"];

    runner
        .run(&(0..names.len(), any::<String>()), |(index, input)| {
            let descriptor = describe(names[index]).unwrap();
            let raw = RawValue::from(input.as_str());
            let first = coerce(descriptor, &raw, &detected);
            let second = coerce(descriptor, &raw, &detected);
            prop_assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}
