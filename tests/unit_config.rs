// tests/unit_config.rs
use cartocheck::checks::Checker;
use cartocheck::config::CheckerConfig;
use cartocheck::error::CheckerError;

#[test]
fn test_defaults_disable_every_safeguard() {
    let config = CheckerConfig::default();
    assert!(!config.prevent_ecw);
    assert!(!config.prevent_auth_config);
    assert!(!config.prevent_service);
    assert!(!config.force_pg_user_pass);
    assert!(!config.prevent_other_drive);
    assert!(!config.allow_parent_folder);
    assert!(!config.cloud_hosting);
    assert_eq!(config.cloud_domain, "lizmap.com");
    assert_eq!(config.raster_cell_threshold, 50_000_000);
}

#[test]
fn test_empty_toml_yields_defaults() {
    let config = CheckerConfig::from_toml_str("").unwrap();
    assert!(!config.prevent_ecw);
    assert_eq!(config.raster_cell_threshold, 50_000_000);
}

#[test]
fn test_toml_overrides() {
    let config = CheckerConfig::from_toml_str(
        r#"
prevent_ecw = true
prevent_service = true
allow_parent_folder = true
parent_folder = "shared"
raster_cell_threshold = 1000
"#,
    )
    .unwrap();
    assert!(config.prevent_ecw);
    assert!(config.prevent_service);
    assert!(config.allow_parent_folder);
    assert_eq!(config.parent_folder, "shared");
    assert_eq!(config.raster_cell_threshold, 1000);
}

#[test]
fn test_malformed_toml_is_an_error() {
    assert!(matches!(
        CheckerConfig::from_toml_str("prevent_ecw = \"maybe\""),
        Err(CheckerError::ConfigParse(_))
    ));
}

#[test]
fn test_parent_folder_token_is_required() {
    let mut config = CheckerConfig::new();
    config.allow_parent_folder = true;
    assert!(matches!(Checker::new(config), Err(CheckerError::Config(_))));
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = CheckerConfig::new();
    config.cloud_hosting = true;
    config.parent_folder = "data".to_string();
    let serialized = toml::to_string(&config).unwrap();
    let reparsed: CheckerConfig = toml::from_str(&serialized).unwrap();
    assert!(reparsed.cloud_hosting);
    assert_eq!(reparsed.parent_folder, "data");
}
