//! Tests for TOML configuration and environment overrides

use crate::app::cli::config::*;
use crate::indexer::config::{DEFAULT_EXTENSIONS, DEFAULT_PROGRESS_INTERVAL};
use serial_test::serial;
use std::collections::HashMap;

fn apply(source: &str) -> Result<AppConfig, ConfigError> {
    let table: toml::Table = toml::from_str(source).unwrap();
    let mut config = AppConfig::default();
    apply_toml_values(&mut config, &table)?;
    Ok(config)
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults_without_file() {
    let config = AppConfig::default();
    assert!(config.index.admins.is_empty());
    assert_eq!(config.index.index_extensions, DEFAULT_EXTENSIONS);
    assert_eq!(config.index.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    assert_eq!(config.index.log_channel, None);
}

#[test]
fn test_full_file() {
    let config = apply(
        r#"
        admins = [111, "222", "333,444"]
        index-extensions = ["MKV", ".mp4", "srt"]
        log-channel = -100555
        progress-interval = 10
        log-level = "debug"
        log-format = "ext"
        log-file = "/tmp/mediaindex.log"
        color = false
        "#,
    )
    .unwrap();

    assert_eq!(
        config.index.admins.iter().copied().collect::<Vec<_>>(),
        vec![111, 222, 333, 444]
    );
    assert_eq!(config.index.index_extensions, vec!["mkv", "mp4", "srt"]);
    assert_eq!(config.index.log_channel, Some(-100555));
    assert_eq!(config.index.progress_interval, 10);
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.log_format.as_deref(), Some("ext"));
    assert_eq!(config.log_file.as_deref(), Some("/tmp/mediaindex.log"));
    assert_eq!(config.color, Some(false));
    assert!(config.warnings.is_empty());
}

#[test]
fn test_scalar_and_comma_forms() {
    let config = apply(
        r#"
        admins = 7
        index-extensions = "mkv, webm,,mkv"
        log-file = "none"
        "#,
    )
    .unwrap();

    assert!(config.index.is_admin(7));
    assert_eq!(config.index.index_extensions, vec!["mkv", "webm"]);
    assert_eq!(config.log_file, None);
}

#[test]
fn test_unknown_keys_warn() {
    let config = apply("bot-token = \"abc\"\nadmins = [1]").unwrap();
    assert_eq!(config.warnings.len(), 1);
    assert!(config.warnings[0].contains("bot-token"));
}

#[test]
fn test_invalid_values_name_the_key() {
    let cases = [
        "admins = [\"abc\"]",
        "admins = true",
        "index-extensions = []",
        "index-extensions = [\"a/b\"]",
        "progress-interval = 0",
        "progress-interval = -3",
        "log-channel = 1.5",
        "color = \"yes\"",
    ];
    for case in cases {
        let key = case.split(' ').next().unwrap();
        match apply(case) {
            Err(ConfigError::Invalid { key: reported, .. }) => assert_eq!(reported, key, "{case}"),
            other => panic!("{case}: expected an invalid-value error, got {other:?}"),
        }
    }
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = apply("admins = [1]\nindex-extensions = [\"mkv\"]\nlog-channel = -100").unwrap();

    apply_env_overrides(
        &mut config,
        env(&[
            (ENV_ADMINS, "5, 6"),
            (ENV_INDEX_EXTENSIONS, "avi"),
            (ENV_LOG_CHANNEL, ""),
        ]),
    )
    .unwrap();

    assert_eq!(config.index.admins.iter().copied().collect::<Vec<_>>(), vec![5, 6]);
    assert_eq!(config.index.index_extensions, vec!["avi"]);
    assert_eq!(config.index.log_channel, None);
}

#[test]
fn test_env_rejects_bad_ids() {
    let mut config = AppConfig::default();
    let result = apply_env_overrides(&mut config, env(&[(ENV_ADMINS, "1,two")]));
    assert!(matches!(result, Err(ConfigError::Invalid { ref key, .. }) if key == ENV_ADMINS));
}

#[test]
fn test_summary_lines() {
    let config = apply("admins = [3, 1]\nprogress-interval = 5").unwrap();
    let lines = config.summary_lines();
    assert!(lines.contains(&"admins: 1, 3".to_string()));
    assert!(lines.contains(&"progress-interval: 5".to_string()));
    assert!(lines.contains(&"log-channel: none".to_string()));
}

#[tokio::test]
#[serial]
async fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mediaindex.toml");
    std::fs::write(&path, "admins = [42]\nprogress-interval = 3\n").unwrap();

    let config = load_config(Some(&path)).await.unwrap();

    assert!(config.index.is_admin(42));
    assert_eq!(config.index.progress_interval, 3);
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
}

#[tokio::test]
#[serial]
async fn test_load_reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        load_config(Some(&missing)).await,
        Err(ConfigError::Missing { .. })
    ));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "admins = [").unwrap();
    assert!(matches!(
        load_config(Some(&broken)).await,
        Err(ConfigError::Parse { .. })
    ));
}

#[tokio::test]
#[serial]
async fn test_load_applies_process_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mediaindex.toml");
    std::fs::write(&path, "log-channel = -1001\n").unwrap();

    std::env::set_var(ENV_LOG_CHANNEL, "-1002");
    let result = load_config(Some(&path)).await;
    std::env::remove_var(ENV_LOG_CHANNEL);

    assert_eq!(result.unwrap().index.log_channel, Some(-1002));
}
