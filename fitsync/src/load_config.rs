/// `load_config` module: loads and adapts a static YAML config — including
/// environment secret injection — into the typed CLI configuration.
///
/// This module is the only place where untrusted YAML is parsed and mapped to
/// strongly-typed structs.
///
/// # Responsibilities
/// - Parse the user-supplied YAML configuration file
/// - Inject the upstream password from `FITSYNC_PASSWORD` when the file omits
///   it (config files should not carry secrets)
/// - Produce clear diagnostics for CLI and tests on any loading failure
///
/// # Errors
/// All errors here use `anyhow::Error` for context-rich diagnostics, surfaced
/// at the CLI boundary.
use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Environment variable consulted for the upstream password.
pub const PASSWORD_ENV: &str = "FITSYNC_PASSWORD";

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub import: ImportSection,
    pub store: StoreSection,
}

/// `import:` section — upstream account and default date range.
#[derive(Debug, Deserialize)]
pub struct ImportSection {
    pub username: String,
    /// Optional in the file; `FITSYNC_PASSWORD` takes precedence when set.
    #[serde(default)]
    pub password: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// `store:` section — document store connection parameters.
#[derive(Debug, Deserialize)]
pub struct StoreSection {
    pub host: String,
    pub database: String,
}

/// Loads a static YAML config file (no secrets required in it).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(config)
}

/// Resolve the upstream password: environment first, then the config file.
pub fn resolve_password(import: &ImportSection) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    match &import.password {
        Some(password) => Ok(password.clone()),
        None => Err(anyhow::anyhow!(
            "No password configured: set {PASSWORD_ENV} or the import.password config key"
        )),
    }
}
