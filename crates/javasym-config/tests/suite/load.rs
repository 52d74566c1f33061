use std::path::PathBuf;

use javasym_config::{ConfigError, LoggingConfig, RuntimeConfig, SolverConfig};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_uses_defaults() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
    assert!(config.runtime.enabled);
    assert!(config.runtime.allowed_prefixes.is_empty());
    assert_eq!(config.logging, LoggingConfig { level: "info".into(), json: false });
}

#[test]
fn parses_every_section() {
    let text = r#"
jars = ["lib/guava.jar"]
source_roots = ["src/main/java", "/abs/src"]

[runtime]
enabled = true
allowed_prefixes = ["java.", "javax."]

[logging]
level = "debug"
json = true
"#;
    let config = SolverConfig::from_toml_str(text).unwrap();
    assert_eq!(config.jars, vec![PathBuf::from("lib/guava.jar")]);
    assert_eq!(
        config.source_roots,
        vec![PathBuf::from("src/main/java"), PathBuf::from("/abs/src")]
    );
    assert_eq!(
        config.runtime,
        RuntimeConfig {
            enabled: true,
            allowed_prefixes: vec!["java.".into(), "javax.".into()],
        }
    );
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SolverConfig::from_toml_str("classpath = []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");

    let err = SolverConfig::from_toml_str("[runtime]\nenable = false\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn parse_errors_do_not_echo_values() {
    let err = SolverConfig::from_toml_str("[logging]\njson = \"secret-value\"\n").unwrap_err();
    assert!(!err.to_string().contains("secret-value"), "{err}");
}

#[test]
fn load_resolves_paths_against_the_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("javasym.toml");
    std::fs::write(&path, "jars = [\"deps/a.jar\"]\nsource_roots = [\"src\"]\n").unwrap();

    let config = SolverConfig::load(&path).unwrap();
    assert_eq!(config.jars, vec![dir.path().join("deps/a.jar")]);
    assert_eq!(config.source_roots, vec![dir.path().join("src")]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SolverConfig::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}
