use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// OpenWeather current-weather endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// City shown when the shell is not given one.
pub const DEFAULT_CITY: &str = "Moscow";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Immutable settings shared by every request a [`crate::WeatherService`] makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_string(), api_key: api_key.into() }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Parse a weather endpoint; only absolute http(s) URLs are accepted.
pub fn parse_endpoint(endpoint: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(endpoint).map_err(|e| format!("invalid endpoint '{endpoint}': {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("endpoint must use http or https, got '{}'", url.scheme()));
    }

    Ok(url)
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// endpoint = "https://api.openweathermap.org/data/2.5/weather"
/// default_city = "Moscow"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides [`DEFAULT_ENDPOINT`] when set.
    pub endpoint: Option<String>,

    pub default_city: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored key with a non-empty value from `env_key`.
    pub fn apply_env_override(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Load from disk and apply the `OPENWEATHER_API_KEY` override.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn default_city(&self) -> &str {
        self.default_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    /// Settings for the fetch service; fails when no API key is known or the
    /// endpoint override is not an http(s) URL. A blank override means default.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `clima configure` or set {API_KEY_ENV}."
                )
            })?;

        let cfg = ServiceConfig::new(api_key);
        match self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(endpoint) => {
                parse_endpoint(endpoint).map_err(|msg| {
                    anyhow!("{msg}\nHint: run `clima configure` to fix the endpoint.")
                })?;
                Ok(cfg.with_endpoint(endpoint))
            }
            None => Ok(cfg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_config_errors_without_api_key() {
        let cfg = Config::default();
        let err = cfg.service_config().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `clima configure`"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config { api_key: Some("   ".into()), ..Config::default() };
        assert!(cfg.service_config().is_err());
    }

    #[test]
    fn service_config_uses_default_endpoint() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        let service = cfg.service_config().expect("key is set");

        assert_eq!(service.api_key, "KEY");
        assert_eq!(service.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn parses_toml_with_endpoint_override() {
        let cfg = Config::from_toml_str(
            r#"
            api_key = "KEY"
            endpoint = "http://localhost:8080/weather"
            default_city = "Kazan"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.default_city(), "Kazan");
        let service = cfg.service_config().expect("key is set");
        assert_eq!(service.endpoint, "http://localhost:8080/weather");
    }

    #[test]
    fn blank_endpoint_falls_back_to_default() {
        for endpoint in ["", "   "] {
            let cfg = Config {
                api_key: Some("KEY".into()),
                endpoint: Some(endpoint.into()),
                ..Config::default()
            };

            let service = cfg.service_config().expect("blank endpoint means default");
            assert_eq!(service.endpoint, DEFAULT_ENDPOINT);
        }
    }

    #[test]
    fn unusable_endpoint_is_rejected() {
        for endpoint in ["not a url", "ftp://example.test/weather", "mailto:weather@example.test"] {
            let cfg = Config {
                api_key: Some("KEY".into()),
                endpoint: Some(endpoint.into()),
                ..Config::default()
            };

            let err = cfg.service_config().unwrap_err();
            assert!(err.to_string().contains("endpoint"), "endpoint {endpoint}: {err}");
        }
    }

    #[test]
    fn parse_endpoint_accepts_http_and_https() {
        assert!(parse_endpoint("http://localhost:8080/weather").is_ok());
        assert!(parse_endpoint(DEFAULT_ENDPOINT).is_ok());
        assert!(parse_endpoint("").is_err());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = Config::from_toml_str("").expect("empty toml is valid");

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_city(), DEFAULT_CITY);
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        cfg.apply_env_override(Some(String::new()));
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));

        cfg.apply_env_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            endpoint: None,
            default_city: Some("Paris".into()),
        };

        let text = toml::to_string_pretty(&cfg).expect("serializes");
        assert_eq!(Config::from_toml_str(&text).expect("parses"), cfg);
    }
}
