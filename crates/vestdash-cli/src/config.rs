//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use vestdash_core::{CredentialTable, DEFAULT_RECENT_SECONDS, UserEntry};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the vest API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Look-back window for recent measurements, in seconds
    #[serde(default = "default_recent_seconds")]
    pub recent_seconds: u64,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Dashboard logins
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_recent_seconds() -> u64 {
    DEFAULT_RECENT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            recent_seconds: default_recent_seconds(),
            no_color: false,
            users: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vestdash")
            .join("config.toml")
    }

    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, or return defaults when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Write a starter config with an example login to `path`
    pub fn init_at(path: &Path) -> Result<Self> {
        if path.exists() {
            bail!("Config already exists: {}", path.display());
        }
        let config = Self::starter();
        config.save_to(path)?;
        Ok(config)
    }

    /// Default settings plus one example login.
    pub fn starter() -> Self {
        Self {
            users: vec![UserEntry {
                username: "operator".to_string(),
                password: "change-me".to_string(),
                display_name: Some("Operator".to_string()),
                vests: Vec::new(),
            }],
            ..Self::default()
        }
    }

    /// Credential table built from the configured logins
    pub fn credential_table(&self) -> CredentialTable {
        self.users.iter().cloned().collect()
    }
}

/// Resolve the API URL: explicit flag/env wins over config.
pub fn resolve_api_url(arg: Option<&str>, config: &Config) -> String {
    arg.map(String::from)
        .unwrap_or_else(|| config.api_url.clone())
}

/// Resolve the request timeout: explicit flag wins over config.
pub fn resolve_timeout(arg: Option<u64>, config: &Config) -> Duration {
    Duration::from_secs(arg.unwrap_or(config.timeout).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.recent_seconds, 3600);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_url = "https://api.example.com/dev"

            [[users]]
            username = "coach"
            password = "ring"
            vests = [1, 2]
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com/dev");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].vests, vec![1, 2]);

        let table = config.credential_table();
        assert!(table.authenticate("coach", "ring").is_some());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::starter();
        config.recent_seconds = 120;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.recent_seconds, 120);
        assert_eq!(loaded.users, config.users);
    }

    #[test]
    fn test_load_invalid_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout = \"soon\"").unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.timeout, 10);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::init_at(&path).unwrap();
        assert_eq!(created.users.len(), 1);
        assert!(Config::init_at(&path).is_err());
    }

    #[test]
    fn test_resolve_api_url_prefers_arg() {
        let config = Config::default();
        assert_eq!(
            resolve_api_url(Some("http://other:9000"), &config),
            "http://other:9000"
        );
        assert_eq!(resolve_api_url(None, &config), "http://localhost:8000");
    }

    #[test]
    fn test_resolve_timeout() {
        let config = Config {
            timeout: 30,
            ..Config::default()
        };
        assert_eq!(resolve_timeout(None, &config), Duration::from_secs(30));
        assert_eq!(resolve_timeout(Some(5), &config), Duration::from_secs(5));
        assert_eq!(resolve_timeout(Some(0), &config), Duration::from_secs(1));
    }
}
