//! Tool configuration layering and boot environment construction

use bootconf::config::{ConfigLoader, InputsConfig};
use bootconf::SettingsResolver;
use std::fs;
use tempfile::TempDir;

use crate::integration::test_utils::with_config_home;

fn write_global_config(test_dir: &TempDir, content: &str) {
    let dir = test_dir.path().join("config").join("bootconf");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_defaults_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();

    let config = with_config_home(&test_dir, &[], || ConfigLoader::load(&workspace).unwrap());
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.output, "stderr");
    assert!(config.inputs.loader_async);
    assert!(!config.inputs.optimized);
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();
    write_global_config(
        &test_dir,
        "[logging]\nlevel = \"debug\"\n\n[inputs]\noptimized = true\nurl = \"?sap-ui-theme=global\"\n",
    );
    fs::write(
        workspace.join("bootconf.toml"),
        "[inputs]\nurl = \"?sap-ui-theme=workspace\"\n",
    )
    .unwrap();

    let config = with_config_home(&test_dir, &[], || ConfigLoader::load(&workspace).unwrap());
    assert_eq!(config.logging.level, "debug");
    assert!(config.inputs.optimized);
    assert_eq!(config.inputs.url.as_deref(), Some("?sap-ui-theme=workspace"));
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join("bootconf.toml"),
        "[inputs]\nurl = \"?sap-ui-theme=workspace\"\n",
    )
    .unwrap();

    let config = with_config_home(
        &test_dir,
        &[("BOOTCONF_INPUTS__URL", "?sap-ui-theme=environment")],
        || ConfigLoader::load(&workspace).unwrap(),
    );
    assert_eq!(config.inputs.url.as_deref(), Some("?sap-ui-theme=environment"));
}

#[test]
fn test_invalid_workspace_file_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    let workspace = test_dir.path().join("workspace");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(workspace.join("bootconf.toml"), "[inputs\nurl = ").unwrap();

    let result = with_config_home(&test_dir, &[], || ConfigLoader::load(&workspace));
    assert!(result.is_err());
}

#[test]
fn test_inputs_resolve_end_to_end() {
    let test_dir = TempDir::new().unwrap();
    fs::write(
        test_dir.path().join("sap-ui-config.json"),
        r#"{"theme": "sap_fiori_3", "xx-nosync": "warn", "libs": "sap.m"}"#,
    )
    .unwrap();
    fs::write(
        test_dir.path().join("index.html"),
        r#"<html><head>
<meta name="sap.allowlistService" content="/allowlist">
</head></html>"#,
    )
    .unwrap();

    let inputs = InputsConfig {
        preboot: Some("sap-ui-config.json".into()),
        url: Some("https://example.com/index.html?sap-ui-theme=sap_horizon".to_string()),
        html: Some("index.html".into()),
        language: Some("fr-CA".to_string()),
        timezone: Some("Europe/Paris".to_string()),
        ..InputsConfig::default()
    };
    let env = inputs.build_environment(test_dir.path()).unwrap();
    let mut resolver = SettingsResolver::new(env);
    resolver.init().unwrap();

    assert_eq!(resolver.theme(), "sap_horizon");
    assert_eq!(resolver.allowlist_service().as_deref(), Some("/allowlist"));
    assert_eq!(resolver.language(), "fr-CA");
    assert_eq!(resolver.timezone(), "Europe/Paris");
    assert_eq!(resolver.modules(), vec!["sap.m.library".to_string()]);
}

#[test]
fn test_invalid_url_input_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    let inputs = InputsConfig {
        url: Some("https://exa mple.com/?sap-ui-theme=x".to_string()),
        ..InputsConfig::default()
    };
    assert!(inputs.build_environment(test_dir.path()).is_err());
}
