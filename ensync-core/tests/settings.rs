use std::path::PathBuf;

use ensync_core::{Channel, Logger, Settings, SettingsError};
use tempfile::TempDir;

#[test]
fn empty_file_gives_defaults() {
    let settings = Settings::from_toml_str("").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.database.path, PathBuf::from("ensync.db"));
    assert_eq!(
        settings.log.channels,
        vec![Channel::Error, Channel::Warning, Channel::Information]
    );
}

#[test]
fn parses_all_sections() {
    let settings = Settings::from_toml_str(
        r#"
[database]
path = "/var/lib/ensync/main.db"

[log]
channels = ["error", "debug"]
"#,
    )
    .unwrap();
    assert_eq!(settings.database.path, PathBuf::from("/var/lib/ensync/main.db"));
    assert_eq!(settings.log.channels, vec![Channel::Error, Channel::Debug]);
}

#[test]
fn unknown_channel_is_rejected() {
    let result = Settings::from_toml_str("[log]\nchannels = [\"verbose\"]\n");
    assert!(matches!(result, Err(SettingsError::Parse(_))));
}

#[test]
fn load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[log]\nchannels = [\"warning\"]\n").unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.log.channels, vec![Channel::Warning]);

    let logger = Logger::from_settings(&settings.log);
    assert_eq!(logger.endpoint_count(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(SettingsError::Io(_))));
}
