use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::categories::Locale;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub api: ApiConfig,
    pub data: DataConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Remote API endpoint and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the CAFM server, e.g. `https://cafm.example.com/api`.
    pub base_url: String,
    /// Bearer token. Overridable via `CAFMDESK_TOKEN`.
    pub token: String,
    /// Tenant identifier. Overridable via `CAFMDESK_TENANT`.
    pub tenant: String,
    /// Display locale for taxonomy labels.
    pub locale: Locale,
}

/// Data directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory (logs, image previews).
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tui: TuiConfig::default(),
            api: ApiConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            token: String::new(),
            tenant: "default".to_string(),
            locale: Locale::En,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { data_dir: None }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/cafmdesk/config.toml`, then apply
    /// environment overrides. Returns `Default` if the file is missing or
    /// unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        };

        if let Ok(token) = std::env::var("CAFMDESK_TOKEN") {
            config.api.token = token;
        }
        if let Ok(tenant) = std::env::var("CAFMDESK_TENANT") {
            config.api.tenant = tenant;
        }

        config
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("cafmdesk"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Where staged image previews live.
    pub fn preview_dir(&self) -> PathBuf {
        self.data_dir().join("previews")
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("cafmdesk").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tui.tick_rate_ms, 50);
        assert_eq!(config.api.tenant, "default");
        assert_eq!(config.api.locale, Locale::En);
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.data.data_dir = Some(PathBuf::from("/tmp/custom"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/custom"));
        assert_eq!(config.preview_dir(), PathBuf::from("/tmp/custom/previews"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(deserialized.api.locale, config.api.locale);
    }

    #[test]
    fn test_locale_parses_from_toml() {
        let config: AppConfig = toml::from_str("[api]\nlocale = \"ar\"\n").unwrap();
        assert_eq!(config.api.locale, Locale::Ar);
    }
}
