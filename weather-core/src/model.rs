use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved place: canonical city/country names plus where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn same_city(&self, city: &str) -> bool {
        self.city.to_lowercase() == city.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Value of the `units` query parameter understood by OpenWeather.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "℃",
            Units::Imperial => "℉",
            Units::Standard => "K",
        }
    }

    /// Convert a Celsius reading into these units.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            Units::Metric => celsius,
            Units::Imperial => celsius * 9.0 / 5.0 + 32.0,
            Units::Standard => celsius + 273.15,
        }
    }
}

/// Per-request presentation settings, captured when a fetch is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub language: String,
    pub units: Units,
}

impl Default for Settings {
    fn default() -> Self {
        Self { language: "en".to_string(), units: Units::Metric }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub units: Units,
    pub observed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_city_ignores_case() {
        let loc = Location {
            city: "Paris".into(),
            country: "FR".into(),
            coordinates: Coordinates { lat: 48.8566, lon: 2.3522 },
        };
        assert!(loc.same_city("paris"));
        assert!(loc.same_city("PARIS"));
        assert!(!loc.same_city("Lyon"));
    }

    #[test]
    fn celsius_conversion() {
        assert_eq!(Units::Metric.from_celsius(20.0), 20.0);
        assert_eq!(Units::Imperial.from_celsius(100.0), 212.0);
        assert!((Units::Standard.from_celsius(0.0) - 273.15).abs() < f64::EPSILON);
    }
}
