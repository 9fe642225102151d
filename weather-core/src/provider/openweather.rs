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

const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeo {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    sys: OwSys,
}

fn first_location(hits: Vec<OwGeo>, query: &str) -> Result<Location, WeatherError> {
    hits.into_iter()
        .next()
        .map(|hit| Location {
            city: hit.name,
            country: hit.country,
            coordinates: Coordinates { lat: hit.lat, lon: hit.lon },
        })
        .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))
}

fn into_result(parsed: OwCurrentResponse, units: Units) -> Result<WeatherResult, WeatherError> {
    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| {
            WeatherError::WeatherUnavailable(format!("no conditions reported for {}", parsed.name))
        })?;

    Ok(WeatherResult {
        city: parsed.name,
        country: parsed.sys.country,
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        description,
        units,
        observed_at: parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
    })
}

fn place_query(city: &str, country: Option<&str>) -> String {
    match country {
        Some(country) => format!("{city},{country}"),
        None => city.to_string(),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve(&self, city: &str, country: Option<&str>) -> Result<Location, WeatherError> {
        let q = place_query(city, country);
        let hits: Vec<OwGeo> = get_json(
            &self.http,
            GEO_URL,
            &[("q", q.clone()), ("limit", "1".to_string()), ("appid", self.api_key.clone())],
            "OpenWeather geocoding",
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
        let parsed: OwCurrentResponse = get_json(
            &self.http,
            WEATHER_URL,
            &[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("units", settings.units.as_str().to_string()),
                ("lang", settings.language.clone()),
                ("appid", self.api_key.clone()),
            ],
            "OpenWeather current weather",
        )
        .await
        .map_err(WeatherError::unavailable)?;

        into_result(parsed, settings.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_takes_first_hit() {
        let body = r#"[{"name":"Paris","lat":48.8589,"lon":2.32,"country":"FR","state":"Ile-de-France"}]"#;
        let hits: Vec<OwGeo> = serde_json::from_str(body).expect("valid json");

        let loc = first_location(hits, "paris,fr").expect("one hit");
        assert_eq!(loc.city, "Paris");
        assert_eq!(loc.country, "FR");
        assert_eq!(loc.coordinates, Coordinates { lat: 48.8589, lon: 2.32 });
    }

    #[test]
    fn empty_geocoding_is_location_not_found() {
        let err = first_location(Vec::new(), "atlantis").unwrap_err();
        assert!(matches!(err, WeatherError::LocationNotFound(ref q) if q == "atlantis"));
    }

    #[test]
    fn current_weather_maps_fields() {
        let body = r#"{
            "name": "Oslo",
            "dt": 1700000000,
            "main": {"temp": -3.5, "feels_like": -8.1, "humidity": 80},
            "weather": [{"id": 600, "description": "light snow"}],
            "sys": {"country": "NO"}
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("valid json");

        let res = into_result(parsed, Units::Metric).expect("has conditions");
        assert_eq!(res.city, "Oslo");
        assert_eq!(res.country, "NO");
        assert_eq!(res.temperature, -3.5);
        assert_eq!(res.feels_like, -8.1);
        assert_eq!(res.description, "light snow");
        assert_eq!(res.observed_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_conditions_is_weather_unavailable() {
        let body = r#"{"name": "Nowhere", "main": {"temp": 1.0, "feels_like": 1.0}, "weather": []}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("valid json");

        let err = into_result(parsed, Units::Metric).unwrap_err();
        assert!(matches!(err, WeatherError::WeatherUnavailable(_)));
    }

    #[test]
    fn endpoints_use_tls() {
        // The API key is sent as a query parameter.
        for url in [GEO_URL, WEATHER_URL] {
            assert!(url.starts_with("https://"), "{url}");
        }
    }

    #[test]
    fn place_query_joins_country() {
        assert_eq!(place_query("paris", Some("fr")), "paris,fr");
        assert_eq!(place_query("paris", None), "paris");
    }
}
