use cms_backup::config::Config;
use cms_backup::constants::{DEFAULT_BACKUP_DIR, DEFAULT_DATABASE_URL, DEFAULT_MAX_IMPORT_BYTES};
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.storage.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.storage.backup_dir, PathBuf::from(DEFAULT_BACKUP_DIR));
    assert_eq!(config.storage.max_import_bytes, 50 * 1024 * 1024);
    assert_eq!(config.storage.max_connections, 4);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Non-SQLite URL should fail
    config.storage.database_url = "postgres://localhost/cms".to_string();
    assert!(config.validate().is_err());

    // Reset and test empty backup dir
    config = Config::default();
    config.storage.backup_dir = PathBuf::new();
    assert!(config.validate().is_err());

    // Reset and test zero import limit
    config = Config::default();
    config.storage.max_import_bytes = 0;
    assert!(config.validate().is_err());

    // Reset and test unknown log level
    config = Config::default();
    config.logging.level = "chatty".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "DEBUG".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("backup_dir = \"backups\""));
    assert!(toml_str.contains("max_import_bytes = 52428800"));
    assert!(!toml_str.contains("file ="));
}

#[test]
fn test_partial_config_deserialization() {
    // Test that partial TOML configs merge with defaults
    let partial_toml = r#"
[storage]
backup_dir = "/var/backups/cms"

[logging]
enabled = true
file = "/var/log/cms-backup.log"
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    // Check that specified values are used
    assert_eq!(config.storage.backup_dir, PathBuf::from("/var/backups/cms"));
    assert!(config.logging.enabled);
    assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/cms-backup.log")));

    // Check that unspecified values use defaults
    assert_eq!(config.storage.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.storage.max_import_bytes, DEFAULT_MAX_IMPORT_BYTES);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_empty_config_deserialization() {
    // Test that empty TOML uses all defaults
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(config.storage.database_url, default_config.storage.database_url);
    assert_eq!(config.storage.backup_dir, default_config.storage.backup_dir);
    assert_eq!(config.logging.enabled, default_config.logging.enabled);
}

#[test]
fn test_load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cms.toml");
    std::fs::write(&path, "[storage]\nmax_connections = 2\n").unwrap();

    let config = Config::load_from(Some(path.as_path())).unwrap();
    assert_eq!(config.storage.max_connections, 2);

    std::fs::write(&path, "[storage]\nmax_connections = 0\n").unwrap();
    assert!(Config::load_from(Some(path.as_path())).is_err());

    assert!(Config::load_from(Some(dir.path().join("missing.toml").as_path())).is_err());
}

#[test]
fn test_generate_config_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("nested").join("config.toml");
    assert!(!config_path.exists());

    // Generate config should create the directory structure
    Config::generate_default_config(&config_path).unwrap();
    assert!(config_path.exists());

    // Verify the file contains expected content and loads back
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("# cms-backup Configuration File"));
    assert!(content.contains("[storage]"));

    let config = Config::load_from_file(&config_path).unwrap();
    assert_eq!(config.storage.database_url, DEFAULT_DATABASE_URL);
}
