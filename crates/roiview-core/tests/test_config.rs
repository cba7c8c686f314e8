use std::io::Write;

use roiview_core::config::AppConfig;
use roiview_core::source::Environment;
use roiview_core::view::ViewState;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.environment, Environment::Local);
    assert_eq!(config.top_roi_cap, 4);
    assert_eq!(config.shapes_canvas_height, 688.0);
    assert_eq!(config.camera, ViewState::new(5454.0, 2600.0, -3.0));
    assert!(config.mirrors_config());
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
}

#[test]
fn test_partial_toml() {
    let config = AppConfig::from_toml_str(
        r#"
environment = "hosted"
top_roi_cap = 5

[transform]
scale = 4.0
"#,
    )
    .unwrap();
    assert_eq!(config.environment, Environment::Hosted);
    assert_eq!(config.top_roi_cap, 5);
    assert_eq!(config.transform.scale, 4.0);
    assert_eq!(config.transform.canvas_height, 5508.0);
    assert!(!config.mirrors_config());
}

#[test]
fn test_invalid_toml_is_error() {
    assert!(AppConfig::from_toml_str("environment = \"cloud\"").is_err());
}

#[test]
fn test_round_trip_through_file() {
    let mut config = AppConfig::default();
    config.service_base_url = "http://10.0.0.2:8080".to_string();
    config.camera = ViewState::new(1.0, 2.0, -4.0);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml::to_string_pretty(&config).unwrap().as_bytes())
        .unwrap();

    let loaded = AppConfig::load(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load(&dir.path().join("missing.toml")).is_err());
}
