use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    favourites::Favourites,
    model::{Settings, Units},
    provider::ProviderId,
};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_provider = "openweather"
/// language = "en"
/// units = "metric"
///
/// [providers.openweather]
/// api_key = "..."
///
/// [[favourites]]
/// city = "Paris"
/// country = "FR"
/// coordinates = { lat = 48.8566, lon = 2.3522 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather" or "weatherapi".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Language code forwarded to the provider for descriptions.
    pub language: String,

    pub units: Units,

    pub request_timeout_secs: u64,

    pub providers: HashMap<String, ProviderConfig>,

    pub favourites: Favourites,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            language: "en".to_string(),
            units: Units::Metric,
            request_timeout_secs: 10,
            providers: HashMap::new(),
            favourites: Favourites::new(),
        }
    }
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow!(
                "No default provider configured.\n\
                 Hint: set `default_provider` in the config file or delete it to be asked again."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Set or replace a provider API key, making it the default if none is set.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.set_default_provider(provider_id);
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn settings(&self) -> Settings {
        Settings { language: self.language.clone(), units: self.units }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where the configuration (and with it the favourites) is persisted.
pub trait ConfigStore {
    /// Load the configuration; a store with nothing saved yields the default.
    fn load(&self) -> Result<Config>;

    /// Replace the persisted configuration with `config`.
    fn save(&self, config: &Config) -> Result<()>;
}

/// TOML file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            // First run: no config file, return empty.
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(config).context("Failed to serialize configuration to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), favourites = config.favourites.len(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Location};

    fn paris() -> Location {
        Location {
            city: "Paris".into(),
            country: "FR".into(),
            coordinates: Coordinates { lat: 48.8566, lon: 2.3522 },
        }
    }

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "WEATHER_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");

        assert_eq!(default, ProviderId::OpenWeather);
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), Some("WEATHER_KEY"));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.set_default_provider(ProviderId::WeatherApi);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::WeatherApi);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("units = \"imperial\"\n").expect("valid toml");

        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(cfg.favourites.is_empty());
    }

    #[test]
    fn missing_file_loads_empty_favourites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("nested").join("config.toml"));

        assert!(!store.exists());
        let cfg = store.load().expect("missing file is not an error");
        assert!(cfg.favourites.is_empty());
    }

    #[test]
    fn save_then_load_returns_same_favourites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("config.toml"));

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        cfg.favourites.add(paris()).expect("add paris");
        cfg.favourites
            .add(Location {
                city: "Oslo".into(),
                country: "NO".into(),
                coordinates: Coordinates { lat: 59.9139, lon: 10.7522 },
            })
            .expect("add oslo");

        store.save(&cfg).expect("save");
        let loaded = store.load().expect("load");

        assert_eq!(loaded.favourites, cfg.favourites);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn corrupt_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "favourites = 12").expect("write");

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
