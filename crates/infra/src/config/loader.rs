//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. `.env` in the working directory (or a parent) is applied first
//! 2. Attempts to load from environment variables
//! 3. If the base URL is not set, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SMARTPANTRY_API_BASE_URL`: Server origin (required for env loading)
//! - `SMARTPANTRY_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `SMARTPANTRY_USER_AGENT`: User-Agent header value
//! - `SMARTPANTRY_SESSION_PATH`: Token file location
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./smartpantry.json` or `./smartpantry.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use smartpantry_domain::{ApiConfig, Config, Result, SessionConfig, SmartPantryError};

pub const BASE_URL_VAR: &str = "SMARTPANTRY_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "SMARTPANTRY_API_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "SMARTPANTRY_USER_AGENT";
pub const SESSION_PATH_VAR: &str = "SMARTPANTRY_SESSION_PATH";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (after applying any
/// `.env` file). If the base URL is missing, falls back to a config file.
/// The result is validated either way.
///
/// # Errors
/// Returns `SmartPantryError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Applied .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the base URL is required; the other variables fall back to their
/// defaults when unset.
///
/// # Errors
/// Returns `SmartPantryError::Config` if the base URL is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var(BASE_URL_VAR)?;
    let defaults = ApiConfig::default();

    let timeout_secs = match std::env::var(TIMEOUT_VAR) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
            SmartPantryError::Config(format!("Invalid {}: {}", TIMEOUT_VAR, e))
        })?,
        Err(_) => defaults.timeout_secs,
    };
    let user_agent = std::env::var(USER_AGENT_VAR).unwrap_or(defaults.user_agent);
    let storage_path = std::env::var_os(SESSION_PATH_VAR)
        .map_or_else(|| SessionConfig::default().storage_path, PathBuf::from);

    Ok(Config {
        api: ApiConfig { base_url, timeout_secs, user_agent },
        session: SessionConfig { storage_path },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SmartPantryError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SmartPantryError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SmartPantryError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SmartPantryError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SmartPantryError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SmartPantryError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SmartPantryError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("smartpantry.json"),
        dir.join("smartpantry.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `SmartPantryError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SmartPantryError::Config(format!(
            "Missing required environment variable: {}",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [BASE_URL_VAR, TIMEOUT_VAR, USER_AGENT_VAR, SESSION_PATH_VAR] {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(BASE_URL_VAR, "https://pantry.example.com");
        std::env::set_var(TIMEOUT_VAR, "12");
        std::env::set_var(USER_AGENT_VAR, "pantry-cli/2.0");
        std::env::set_var(SESSION_PATH_VAR, "/tmp/pantry/session.json");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.api.base_url, "https://pantry.example.com");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.api.user_agent, "pantry-cli/2.0");
        assert_eq!(config.session.storage_path, PathBuf::from("/tmp/pantry/session.json"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(BASE_URL_VAR, "http://localhost:8000");
        let config = load_from_env().expect("config from env");
        assert_eq!(config.api.timeout_secs, ApiConfig::default().timeout_secs);
        assert_eq!(config.session, SessionConfig::default());

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, SmartPantryError::Config(ref msg) if msg.contains(BASE_URL_VAR)));

        std::env::set_var(BASE_URL_VAR, "   ");
        assert!(load_from_env().is_err(), "blank base URL counts as missing");

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(BASE_URL_VAR, "http://localhost:8000");
        std::env::set_var(TIMEOUT_VAR, "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, SmartPantryError::Config(_)), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "api": { "base_url": "https://pantry.example.com", "timeout_secs": 5 },
                "session": { "storage_path": "/var/lib/pantry/session.json" }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON file");
        assert_eq!(config.api.base_url, "https://pantry.example.com");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.session.storage_path, PathBuf::from("/var/lib/pantry/session.json"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml_partial() {
        let path = temp_config(
            r#"
[api]
base_url = "http://10.0.0.5:8000"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML file");
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.api.timeout_secs, ApiConfig::default().timeout_secs);
        assert_eq!(config.session, SessionConfig::default());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(SmartPantryError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = temp_config(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_validates_env_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(BASE_URL_VAR, "ftp://pantry.example.com");
        let err = load().unwrap_err();
        assert!(matches!(err, SmartPantryError::Config(ref msg) if msg.contains("http")));

        clear_env();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
