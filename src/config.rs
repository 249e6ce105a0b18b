use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_URL_ENV: &str = "VAXVET_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub notifications: NotificationsConfig,
  /// Default filter for the file log; `RUST_LOG` wins when set
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
  pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Seconds a cached read is served without a request
  #[serde(default = "default_stale_secs")]
  pub stale_secs: u64,
  /// Keep the cache in a SQLite file across runs
  #[serde(default)]
  pub persistent: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      stale_secs: default_stale_secs(),
      persistent: false,
    }
  }
}

impl CacheConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  #[serde(default = "default_notifications_path")]
  pub path: String,
}

impl Default for NotificationsConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: default_notifications_path(),
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_stale_secs() -> u64 {
  300
}

fn default_true() -> bool {
  true
}

fn default_notifications_path() -> String {
  "/hubs/notifications".to_string()
}

impl Config {
  /// Load configuration.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./vaxvet.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/vaxvet/config.yaml
  ///
  /// `api_url` (the `--api-url` flag) and then `VAXVET_API_URL` override
  /// `api.base_url`. With an override no config file is required.
  pub fn load(explicit_path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let file = path.as_deref().map(Self::load_from_path).transpose()?;
    let api_url = api_url.or_else(|| std::env::var(API_URL_ENV).ok());
    Self::resolve(file, api_url)
  }

  /// Merge a parsed file with an API URL override and validate the result.
  pub fn resolve(file: Option<Config>, api_url: Option<String>) -> Result<Self> {
    let has_file = file.is_some();
    let mut config = file.unwrap_or_default();
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
      config.api.base_url = Some(url);
    }

    match config.api.base_url.as_deref().map(str::trim) {
      Some(url) if !url.is_empty() => Ok(config),
      _ if has_file => Err(eyre!("api.base_url is not set in the config file")),
      _ => Err(eyre!(
        "No configuration file found. Create one at ~/.config/vaxvet/config.yaml \
         or set {} / --api-url.",
        API_URL_ENV
      )),
    }
  }

  pub fn base_url(&self) -> &str {
    self.api.base_url.as_deref().unwrap_or_default().trim()
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("vaxvet.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("vaxvet").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn parse(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }
}

/// Per-user data directory holding the log, session store and cache.
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("vaxvet"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::parse("api:\n  base_url: https://clinic.test/api\n").unwrap();
    assert_eq!(config.base_url(), "https://clinic.test/api");
    assert_eq!(config.cache.stale_secs, 300);
    assert!(!config.cache.persistent);
    assert!(config.notifications.enabled);
    assert_eq!(config.notifications.path, "/hubs/notifications");
    assert_eq!(config.log_level, "info");
    assert!(config.title.is_none());
  }

  #[test]
  fn test_full_file() {
    let yaml = r#"
api:
  base_url: https://clinic.test/api
title: Kadıköy Clinic
cache:
  stale_secs: 30
  persistent: true
notifications:
  enabled: false
  path: /events
log_level: debug
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.title.as_deref(), Some("Kadıköy Clinic"));
    assert_eq!(config.cache.stale_time(), Duration::from_secs(30));
    assert!(config.cache.persistent);
    assert!(!config.notifications.enabled);
    assert_eq!(config.notifications.path, "/events");
  }

  #[test]
  fn test_override_without_file() {
    let config = Config::resolve(None, Some("http://localhost:5000/api".into())).unwrap();
    assert_eq!(config.base_url(), "http://localhost:5000/api");
    assert_eq!(config.cache.stale_secs, 300);
  }

  #[test]
  fn test_override_beats_file() {
    let file = Config::parse("api:\n  base_url: https://clinic.test/api\n").unwrap();
    let config = Config::resolve(Some(file), Some("http://localhost:5000".into())).unwrap();
    assert_eq!(config.base_url(), "http://localhost:5000");
  }

  #[test]
  fn test_missing_base_url_is_an_error() {
    let file = Config::parse("title: VaxVet\n").unwrap();
    assert!(Config::resolve(Some(file), None).is_err());
    assert!(Config::resolve(None, None).is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/vaxvet.yaml")), None).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
