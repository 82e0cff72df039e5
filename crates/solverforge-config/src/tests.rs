//! Tests for session configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "fast_assert"
        fact_capacity = 64
    "#;

    let config = SessionConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FastAssert);
    assert_eq!(config.fact_capacity, Some(64));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
    "#;

    let config = SessionConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.fact_capacity, None);
}

#[test]
fn test_empty_toml_is_default() {
    let config = SessionConfig::from_toml_str("").unwrap();
    assert_eq!(config, SessionConfig::default());
    assert_eq!(config.environment_mode, EnvironmentMode::NoAssert);
}

#[test]
fn test_unknown_mode_rejected() {
    let err = SessionConfig::from_toml_str(r#"environment_mode = "paranoid""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_zero_capacity_rejected() {
    let err = SessionConfig::from_toml_str("fact_capacity = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file() {
    let err = SessionConfig::load("/nonexistent/session.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = SessionConfig::new()
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_fact_capacity(16);

    assert!(config.environment_mode.is_asserting());
    assert!(config.environment_mode.is_full_assert());
    assert_eq!(config.fact_capacity, Some(16));
    assert!(!EnvironmentMode::FastAssert.is_full_assert());
}
