//! 配置模块测试

use super::*;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = TranslatorConfig::default();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.logging.level, "info");
    assert!(config.api_url.is_none());
    assert!(config.api_key.is_none());
}

#[test]
fn test_from_lookup_reads_all_values() {
    let config = TranslatorConfig::from_lookup(lookup_from(&[
        (ENV_API_URL, "https://api.example.com/v1"),
        (ENV_API_KEY, "sk-test"),
        (ENV_MODEL, "deepseek-chat"),
        (ENV_LOG_LEVEL, "debug"),
    ]));

    assert_eq!(config.api_url.as_deref(), Some("https://api.example.com/v1"));
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.model, "deepseek-chat");
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_lookup_blank_values_are_missing() {
    let config = TranslatorConfig::from_lookup(lookup_from(&[
        (ENV_API_URL, "   "),
        (ENV_API_KEY, ""),
    ]));
    assert!(config.api_url.is_none());
    assert!(config.api_key.is_none());
    assert_eq!(config.model, "gpt-4o-mini");
}

#[test]
fn test_validate_missing_url() {
    let config = TranslatorConfig {
        api_key: Some("sk-test".to_string()),
        ..TranslatorConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingField("api_url")));
    assert!(err.to_string().contains("api_url"));
}

#[test]
fn test_validate_missing_key() {
    let config = TranslatorConfig {
        api_url: Some("https://api.example.com".to_string()),
        api_key: Some("  ".to_string()),
        ..TranslatorConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingField("api_key")));
}

#[test]
fn test_validate_rejects_non_http_url() {
    let config = TranslatorConfig::new("ftp://example.com", "sk-test");
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "api_url",
            ..
        }
    ));
}

#[test]
fn test_validate_rejects_blank_model() {
    let config = TranslatorConfig::new("https://example.com", "sk-test").with_model(" ");
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "model", .. })
    ));
}

#[test]
fn test_debug_redacts_api_key() {
    let config = TranslatorConfig::new("https://example.com", "sk-very-secret");
    let debug = format!("{:?}", config);
    assert!(!debug.contains("sk-very-secret"));
    assert!(debug.contains("***"));
}

#[test]
fn test_yaml_round_trip_with_defaults() {
    let yaml = r#"
api_url: https://api.example.com/v1/chat/completions
api_key: sk-yaml
"#;
    let config = TranslatorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        config.api_url.as_deref(),
        Some("https://api.example.com/v1/chat/completions")
    );
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.logging, LoggingConfig::default());

    let dumped = config.to_yaml().unwrap();
    assert_eq!(TranslatorConfig::from_yaml_str(&dumped).unwrap(), config);
}

#[test]
fn test_yaml_invalid() {
    let err = TranslatorConfig::from_yaml_str("api_url: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_url: https://api.example.com\napi_key: sk-file\nmodel: qwen-plus\nlogging:\n  level: warn"
    )
    .unwrap();

    let config = TranslatorConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    assert_eq!(config.model, "qwen-plus");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TranslatorConfig::load_from_file(dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_expand_tilde() {
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_tilde(Path::new("~")), home);
        assert_eq!(
            expand_tilde(Path::new("~/.config/x.yaml")),
            home.join(".config/x.yaml")
        );
    }
    assert_eq!(
        expand_tilde(Path::new("/etc/x.yaml")),
        PathBuf::from("/etc/x.yaml")
    );
    assert_eq!(
        expand_tilde(Path::new("~other/x.yaml")),
        PathBuf::from("~other/x.yaml")
    );
}

#[test]
fn test_default_config_path() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("stream-translator/config.yaml"));
    }
}
