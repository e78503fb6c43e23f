use happilens::Config;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let cfg = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.world_bank.base_url, "https://api.worldbank.org/v2");
    assert_eq!(cfg.world_bank.timeout(), Duration::from_secs(15));
    assert_eq!(cfg.happiness.base_url, "https://data.worldhappiness.report");
    assert!(cfg.development_mode);
    assert_eq!(cfg.mock_seed, None);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
development_mode = false
mock_seed = 99

[world_bank]
base_url = "http://localhost:8080/v2"
timeout_secs = 3
"#,
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert!(!cfg.development_mode);
    assert_eq!(cfg.mock_seed, Some(99));
    assert_eq!(cfg.world_bank.base_url, "http://localhost:8080/v2");
    assert_eq!(cfg.world_bank.timeout_secs, 3);
    assert_eq!(cfg.happiness, Config::default().happiness);
}

#[test]
fn invalid_toml_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "development_mode = \"maybe\"").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parse config"));
}
