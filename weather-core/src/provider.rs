use crate::{
    Config, Coordinates, Location, Settings, WeatherError, WeatherResult,
    provider::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, sync::Arc, time::Duration};

pub mod openweather;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// Geocoding and current-weather lookups against a remote service.
///
/// Implementations are shared by every in-flight fetch, so they hold no
/// per-request state.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn resolve(&self, city: &str, country: Option<&str>) -> Result<Location, WeatherError>;

    async fn current_weather(
        &self,
        coordinates: Coordinates,
        settings: &Settings,
    ) -> Result<WeatherResult, WeatherError>;
}

/// Construct a provider for `id` with an explicit API key.
pub fn build_provider(
    id: ProviderId,
    api_key: String,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let http = Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let provider: Arc<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Arc::new(OpenWeatherProvider::new(api_key, http)),
        ProviderId::WeatherApi => Arc::new(WeatherApiProvider::new(api_key, http)),
    };

    Ok(provider)
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: add it under [providers.{id}] or set WEATHER_API_KEY."
        )
    })?;

    build_provider(id, api_key.to_owned(), config.request_timeout())
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

/// GET `url` and decode a JSON body, reporting non-2xx statuses with the body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
    what: &str,
) -> anyhow::Result<T> {
    tracing::debug!(url, what, "provider request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
