use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    WeatherError,
    model::{Coordinates, Location, Settings, Units, WeatherResult},
    provider::{get_json, unix_to_utc},
};

use super::WeatherProvider;

const SEARCH_URL: &str = "https://api.weatherapi.com/v1/search.json";
const CURRENT_URL: &str = "https://api.weatherapi.com/v1/current.json";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchHit {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

fn first_location(hits: Vec<WaSearchHit>, query: &str) -> Result<Location, WeatherError> {
    hits.into_iter()
        .next()
        .map(|hit| Location {
            city: hit.name,
            country: hit.country,
            coordinates: Coordinates { lat: hit.lat, lon: hit.lon },
        })
        .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))
}

// WeatherAPI only reports Celsius/Fahrenheit; convert locally so Kelvin works too.
fn into_result(parsed: WaResponse, units: Units) -> Result<WeatherResult, WeatherError> {
    if parsed.current.condition.text.trim().is_empty() {
        return Err(WeatherError::WeatherUnavailable(format!(
            "no conditions reported for {}",
            parsed.location.name
        )));
    }

    let ts = parsed.current.last_updated_epoch.or(parsed.location.localtime_epoch);

    Ok(WeatherResult {
        city: parsed.location.name,
        country: parsed.location.country,
        temperature: units.from_celsius(parsed.current.temp_c),
        feels_like: units.from_celsius(parsed.current.feelslike_c),
        description: parsed.current.condition.text,
        units,
        observed_at: ts.and_then(unix_to_utc).unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn resolve(&self, city: &str, country: Option<&str>) -> Result<Location, WeatherError> {
        let q = match country {
            Some(country) => format!("{city} {country}"),
            None => city.to_string(),
        };

        let hits: Vec<WaSearchHit> = get_json(
            &self.http,
            SEARCH_URL,
            &[("key", self.api_key.clone()), ("q", q.clone())],
            "WeatherAPI search",
        )
        .await
        .map_err(WeatherError::unavailable)?;

        first_location(hits, &q)
    }

    async fn current_weather(
        &self,
        coordinates: Coordinates,
        settings: &Settings,
    ) -> Result<WeatherResult, WeatherError> {
        let parsed: WaResponse = get_json(
            &self.http,
            CURRENT_URL,
            &[
                ("key", self.api_key.clone()),
                ("q", format!("{},{}", coordinates.lat, coordinates.lon)),
                ("lang", settings.language.clone()),
            ],
            "WeatherAPI current",
        )
        .await
        .map_err(WeatherError::unavailable)?;

        into_result(parsed, settings.units)
    }
}
