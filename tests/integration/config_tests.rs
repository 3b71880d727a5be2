use dupepurge::config::{Config, ConfigError};
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.io_threads, 4);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPEPURGE_IO_THREADS", "16");
    std::env::set_var("DUPEPURGE_STRICT_DELETE", "true");

    use figment::providers::Env;
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("DUPEPURGE_"));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.io_threads, 16);
    assert!(config.strict_delete);

    std::env::remove_var("DUPEPURGE_IO_THREADS");
    std::env::remove_var("DUPEPURGE_STRICT_DELETE");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
ignore_suffixes = [".swp", ".tmp", "~"]
io_threads = 8
strict_delete = true
"#,
    )
    .unwrap();

    // Use figment directly so environment overrides from other tests cannot leak in
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.ignore_suffixes, vec![".swp", ".tmp", "~"]);
    assert_eq!(config.io_threads, 8);
    assert!(config.strict_delete);
    assert!(!config.use_trash);
}

#[test]
fn test_config_partial_file_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "use_trash = true\n").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert!(config.use_trash);
    assert_eq!(config.io_threads, 4);
    assert!(config.ignore_suffixes.is_empty());
}

#[test]
fn test_config_malformed_falls_back_to_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "this is = = not toml").unwrap();

    assert!(matches!(
        Config::try_load(Some(&config_path)),
        Err(ConfigError::Load(_))
    ));

    let config = Config::load(Some(&config_path));
    assert_eq!(config.ignore_suffixes, Config::default().ignore_suffixes);
    assert!(!config.use_trash);
}

#[test]
fn test_config_missing_file_is_not_an_error() {
    let temp_dir = tempdir().unwrap();
    let config = Config::try_load(Some(&temp_dir.path().join("absent.toml"))).unwrap();
    assert!(config.ignore_suffixes.is_empty());
    assert!(!config.use_trash);
}

#[test]
fn test_default_path_location() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("config.toml"));
    }
}
