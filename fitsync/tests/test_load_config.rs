use chrono::NaiveDate;
use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

use fitsync::load_config::{load_config, resolve_password, PASSWORD_ENV};

const CONFIG_YAML: &str = r#"
import:
  username: tomharrison
  start_date: 2012-11-01
  end_date: 2012-11-30
store:
  host: http://127.0.0.1:8017
  database: fitness
"#;

#[tokio::test]
#[serial]
async fn test_load_config_success_without_password_in_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), CONFIG_YAML).unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.import.username, "tomharrison");
    assert_eq!(config.import.password, None);
    assert_eq!(
        config.import.start_date,
        NaiveDate::from_ymd_opt(2012, 11, 1).unwrap()
    );
    assert_eq!(
        config.import.end_date,
        NaiveDate::from_ymd_opt(2012, 11, 30).unwrap()
    );
    assert_eq!(config.store.host, "http://127.0.0.1:8017");
    assert_eq!(config.store.database, "fitness");
}

#[tokio::test]
#[serial]
async fn test_password_env_takes_precedence_over_file() {
    let config_yaml = r#"
import:
  username: tomharrison
  password: from-file
  start_date: 2012-11-01
  end_date: 2012-11-30
store:
  host: http://127.0.0.1:8017
  database: fitness
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();
    let config = load_config(config_file.path()).expect("Config should load");

    env::set_var(PASSWORD_ENV, "from-env");
    let password = resolve_password(&config.import).expect("password resolves");
    env::remove_var(PASSWORD_ENV);
    assert_eq!(password, "from-env");

    let password = resolve_password(&config.import).expect("password resolves");
    assert_eq!(password, "from-file");
}

#[tokio::test]
#[serial]
async fn test_missing_password_everywhere_is_an_error() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), CONFIG_YAML).unwrap();
    let config = load_config(config_file.path()).expect("Config should load");

    env::remove_var(PASSWORD_ENV);
    let err = resolve_password(&config.import).expect_err("no password available");
    assert!(
        err.to_string().contains(PASSWORD_ENV),
        "error should point at the env var, got: {err}"
    );
}

#[tokio::test]
#[serial]
async fn test_malformed_yaml_is_rejected_with_diagnostics() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "import: [not, a, mapping]").unwrap();

    let err = load_config(config_file.path()).expect_err("malformed config must not load");
    assert!(
        err.to_string().contains("parse"),
        "error should mention parsing, got: {err}"
    );
}

#[tokio::test]
#[serial]
async fn test_missing_file_is_rejected_with_diagnostics() {
    let err = load_config("/definitely/not/here.yaml").expect_err("missing file must not load");
    assert!(err.to_string().contains("read"), "got: {err}");
}
