use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use namedupe::actions::DeleteMode;
use namedupe::config::{Config, ConfigError, ENV_PREFIX};
use namedupe::scanner::ErrorPolicy;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();

    assert!(!config.must_confirm_delete);
    assert!(!config.remove_duplicates);
    assert_eq!(config.delete_mode, DeleteMode::Simulate);
    assert_eq!(config.on_error, ErrorPolicy::Abort);
    assert!(config.workers.is_none());
    assert!(config.ignore_patterns.is_empty());
}

#[test]
fn test_config_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
must_confirm_delete = true
remove_duplicates = true
delete_mode = "permanent"
workers = 6
on_error = "continue"
follow_symlinks = true
skip_hidden = true
ignore_patterns = ["target", "*.o"]
"#,
    )
    .unwrap();

    let config: Config = Config::figment(Some(&path)).extract().unwrap();

    assert!(config.scan_options().needs_confirmation());
    assert_eq!(config.delete_mode, DeleteMode::Permanent);
    assert_eq!(config.workers, Some(6));
    assert_eq!(config.on_error, ErrorPolicy::Continue);
    assert!(config.follow_symlinks);
    assert!(config.skip_hidden);
    assert_eq!(config.ignore_patterns, vec!["target", "*.o"]);

    let finder = config.finder_config();
    assert_eq!(finder.walker_config.workers, 6);
    assert!(finder.walker_config.follow_symlinks);
}

#[test]
fn test_env_overrides_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "workers = 2\n").unwrap();

    std::env::set_var("NAMEDUPE_TEST_ONLY_WORKERS", "9");

    // A dedicated prefix keeps this test away from run_app tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NAMEDUPE_TEST_ONLY_"))
        .extract()
        .unwrap();
    assert_eq!(config.workers, Some(9));

    std::env::remove_var("NAMEDUPE_TEST_ONLY_WORKERS");
    assert_eq!(ENV_PREFIX, "NAMEDUPE_");
}

#[test]
fn test_config_load_explicit_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "delete_mode = \"trash\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.delete_mode, DeleteMode::Trash);
}

#[test]
fn test_config_load_invalid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "workers = \"many\"\n").unwrap();

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempdir().unwrap();
    let result = Config::load(Some(&dir.path().join("nope.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
