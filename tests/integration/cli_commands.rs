//! Command routing through RunContext

use bootconf::cli::{Cli, Commands, InputArgs, RunContext};
use clap::Parser;
use serde_json::Value as JsonValue;
use std::fs;
use tempfile::TempDir;

use crate::integration::test_utils::with_config_home;

fn context(test_dir: &TempDir, inputs: InputArgs) -> RunContext {
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();
    with_config_home(test_dir, &[], || RunContext::new(workspace, None, &inputs).unwrap())
}

fn url_inputs(query: &str) -> InputArgs {
    InputArgs {
        url: Some(query.to_string()),
        ..InputArgs::default()
    }
}

#[test]
fn test_cli_parses_global_input_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "bootconf",
        "resolve",
        "--format",
        "json",
        "--url",
        "?sap-ui-theme=sap_horizon",
        "--meta",
        "sap.allowlistService=/allow",
    ])
    .unwrap();
    assert_eq!(cli.inputs.url.as_deref(), Some("?sap-ui-theme=sap_horizon"));
    assert_eq!(cli.inputs.meta, vec!["sap.allowlistService=/allow".to_string()]);
    assert!(matches!(cli.command, Commands::Resolve { ref format, .. } if format == "json"));
}

#[test]
fn test_cli_rejects_store_with_persistent() {
    let result = Cli::try_parse_from(["bootconf", "--store", "db", "--persistent", "resolve"]);
    assert!(result.is_err());
}

#[test]
fn test_resolve_json_changed_only() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, url_inputs("?sap-ui-theme=sap_horizon&sap-ui-debug=true"));

    let output = ctx
        .execute(&Commands::Resolve {
            format: "json".to_string(),
            changed_only: true,
        })
        .unwrap();
    let parsed: JsonValue = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["theme"], "sap_horizon");
    assert_eq!(parsed["debug"], true);
    assert!(parsed.get("accessibility").is_none());
}

#[test]
fn test_resolve_toml_parses_back() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, url_inputs("?sap-ui-theme=sap_horizon"));

    let output = ctx
        .execute(&Commands::Resolve {
            format: "toml".to_string(),
            changed_only: false,
        })
        .unwrap();
    let parsed: toml::Table = output.parse().unwrap();
    assert_eq!(parsed["theme"].as_str(), Some("sap_horizon"));
    assert_eq!(parsed["accessibility"].as_bool(), Some(true));
}

#[test]
fn test_resolve_rejects_unknown_format() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, InputArgs::default());
    let result = ctx.execute(&Commands::Resolve {
        format: "yaml".to_string(),
        changed_only: false,
    });
    assert!(result.is_err());
}

#[test]
fn test_get_text_and_json() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, url_inputs("?sap-ui-theme=sap_horizon"));

    let text = ctx
        .execute(&Commands::Get {
            name: "THEME".to_string(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(text, "sap_horizon");

    let json = ctx
        .execute(&Commands::Get {
            name: "theme".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: JsonValue = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["theme"], "sap_horizon");
}

#[test]
fn test_get_unknown_setting_fails() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, InputArgs::default());
    let err = ctx
        .execute(&Commands::Get {
            name: "colour".to_string(),
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(bootconf::cli::map_error(&err).contains("colour"));
}

#[test]
fn test_describe_lists_every_setting() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, InputArgs::default());
    let output = ctx
        .execute(&Commands::Describe {
            name: None,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: JsonValue = serde_json::from_str(&output).unwrap();
    let total = bootconf::schema::descriptors().count();
    assert_eq!(parsed["total"].as_u64(), Some(total as u64));
    assert_eq!(parsed["settings"][0]["name"], "theme");
}

#[test]
fn test_apply_prints_one_event_for_all_assignments() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, InputArgs::default());

    let output = ctx
        .execute(&Commands::Apply {
            assignments: vec!["theme=sap_horizon".to_string(), "debug=true".to_string()],
            format: "json".to_string(),
        })
        .unwrap();
    let events: JsonValue = serde_json::from_str(&output).unwrap();
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["changes"]["theme"], "sap_horizon");
    assert_eq!(events[0]["changes"]["debug"], true);
}

#[test]
fn test_apply_invalid_enum_fails() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, InputArgs::default());
    let result = ctx.execute(&Commands::Apply {
        assignments: vec!["animationMode=sparkly".to_string()],
        format: "text".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn test_compat_reads_url_parameter() {
    let test_dir = TempDir::new().unwrap();
    let ctx = context(&test_dir, url_inputs("?sap-ui-compatVersion=1.30.2"));
    let output = ctx.execute(&Commands::Compat { feature: None }).unwrap();
    assert_eq!(output, "1.30.0");
}

#[test]
fn test_preboot_file_relative_to_workspace() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join("preboot.json"), r#"{"theme": "sap_belize"}"#).unwrap();

    let inputs = InputArgs {
        preboot: Some("preboot.json".into()),
        ..InputArgs::default()
    };
    let ctx = context(&test_dir, inputs);
    let output = ctx
        .execute(&Commands::Get {
            name: "theme".to_string(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(output, "sap_belize");
}
