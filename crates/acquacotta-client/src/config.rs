//! TOML-based client configuration.
//!
//! Stores:
//! - Where the backend gateway listens
//! - Default log filter
//!
//! Configuration is stored at `~/.config/acquacotta/client.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Overrides `gateway.base_url` when set.
pub const BACKEND_URL_ENV: &str = "ACQUACOTTA_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_base_url() -> String {
    "http://127.0.0.1:7420".into()
}
fn default_log_filter() -> String {
    "info".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Returns `~/.config/acquacotta[-dev]/` based on ACQUACOTTA_ENV.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn config_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".config");

    let env = std::env::var("ACQUACOTTA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("acquacotta-dev")
    } else {
        base_dir.join("acquacotta")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl ClientConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|e| invalid(e.to_string()))?
                        .into(),
                ),
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                _ => return Err(unknown()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("client.toml"))
    }

    /// Load from the default location and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_from(&Self::path()?)?;
        Ok(cfg.with_backend_override(std::env::var(BACKEND_URL_ENV).ok()))
    }

    /// Load from `path`, writing the defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load client config, using defaults");
            Self::default().with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.gateway.base_url = url;
        }
        self
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Every leaf key with its current value, in file order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            flatten("", &json, &mut out);
        }
        out
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = ClientConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.gateway.base_url, "http://127.0.0.1:7420");
        assert_eq!(parsed.log.filter, "info");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: ClientConfig = toml::from_str("[log]\nfilter = \"debug\"\n").unwrap();
        assert_eq!(parsed.log.filter, "debug");
        assert_eq!(parsed.gateway, GatewayConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.get("log.filter").as_deref(), Some("info"));
        assert_eq!(
            cfg.get("gateway.base_url").as_deref(),
            Some("http://127.0.0.1:7420")
        );
        assert!(cfg.get("gateway").is_none());
        assert!(cfg.get("gateway.missing").is_none());
    }

    #[test]
    fn set_updates_string_value() {
        let mut cfg = ClientConfig::default();
        cfg.set("gateway.base_url", "http://10.0.0.2:9000").unwrap();
        assert_eq!(cfg.gateway.base_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = ClientConfig::default();
        let err = cfg.set("gateway.port", "80").unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::UnknownKey(_))));
        assert!(cfg.set("", "x").is_err());
        assert!(cfg.set("log", "x").is_err());
    }

    #[test]
    fn set_json_value_by_path_checks_types() {
        let mut json = serde_json::json!({"a": {"flag": true, "n": 3}});
        ClientConfig::set_json_value_by_path(&mut json, "a.flag", "false").unwrap();
        ClientConfig::set_json_value_by_path(&mut json, "a.n", "9").unwrap();
        assert_eq!(json["a"]["flag"], false);
        assert_eq!(json["a"]["n"], 9);
        assert!(ClientConfig::set_json_value_by_path(&mut json, "a.flag", "yes").is_err());
        assert!(ClientConfig::set_json_value_by_path(&mut json, "a.n", "-1").is_err());
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");

        let cfg = ClientConfig::load_from(&path).unwrap();

        assert_eq!(cfg, ClientConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        let mut cfg = ClientConfig::default();
        cfg.set("log.filter", "acquacotta_client=trace").unwrap();

        cfg.save_to(&path).unwrap();

        assert_eq!(ClientConfig::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "gateway = 3").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();

        assert!(matches!(err, ClientError::Config(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn backend_override_ignores_blank_values() {
        let cfg = ClientConfig::default().with_backend_override(Some("  ".into()));
        assert_eq!(cfg.gateway.base_url, default_base_url());
        let cfg = cfg.with_backend_override(Some("http://backend:1".into()));
        assert_eq!(cfg.gateway.base_url, "http://backend:1");
    }

    #[test]
    fn entries_lists_every_leaf() {
        let entries = ClientConfig::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"gateway.base_url"));
        assert!(keys.contains(&"log.filter"));
        assert_eq!(entries.len(), 2);
    }
}
