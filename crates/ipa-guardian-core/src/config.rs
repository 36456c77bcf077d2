use ipa_guardian_api::{DEFAULT_MODEL, GEMINI_API_BASE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the generation service credential
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable overriding the model identifier
pub const MODEL_ENV: &str = "IPA_GUARDIAN_MODEL";

/// Main configuration structure
///
/// Loaded from the config file, then overridden by the environment.
/// Priority: CLI > Env > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `API_KEY` and `IPA_GUARDIAN_MODEL` from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<String>, model: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.gemini.model = model;
        }
    }

    /// Get the config file path (XDG on Linux/macOS, AppData on Windows)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("ipa-guardian");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Generation service API key; `API_KEY` in the environment wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout; unset leaves it to the HTTP client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl GeminiConfig {
    /// The API key, or a configuration error if none was provided
    pub fn require_api_key(&self) -> crate::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                crate::Error::ConfigError(format!("{} environment variable not set", API_KEY_ENV))
            })
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_url() -> String {
    GEMINI_API_BASE.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_url: default_api_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Number of apps requested for the initial catalog
    #[serde(default = "default_catalog_size")]
    pub size: usize,
}

fn default_catalog_size() -> usize {
    12
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            size: default_catalog_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.catalog.size, 12);
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = Config::default();
        let err = config.gemini.require_api_key().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: API_KEY environment variable not set"
        );
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.gemini.api_key = Some("   ".to_string());
        assert!(config.gemini.require_api_key().is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.gemini.api_key = Some("from-file".to_string());

        config.apply_overrides(Some("from-env".to_string()), Some("gemini-2.5-pro".to_string()));
        assert_eq!(config.gemini.require_api_key().unwrap(), "from-env");
        assert_eq!(config.gemini.model, "gemini-2.5-pro");

        config.apply_overrides(Some(String::new()), None);
        assert_eq!(config.gemini.require_api_key().unwrap(), "from-env");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[catalog]\nsize = 6\n").unwrap();
        assert_eq!(config.catalog.size, 6);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.gemini.timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.gemini.timeout_secs, Some(30));
        assert!(loaded.gemini.api_key.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.catalog.size, 12);
    }
}
