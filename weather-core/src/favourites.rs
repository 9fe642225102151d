use serde::{Deserialize, Serialize};

use crate::{error::WeatherError, model::Location};

/// Ordered list of favourite locations, unique by city name (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favourites(Vec<Location>);

impl Favourites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, city: &str) -> bool {
        self.0.iter().any(|loc| loc.same_city(city))
    }

    /// Append a location unless a favourite with the same city already exists.
    pub fn add(&mut self, location: Location) -> Result<(), WeatherError> {
        if self.contains(&location.city) {
            return Err(WeatherError::DuplicateFavourite(location.city));
        }
        self.0.push(location);
        Ok(())
    }

    /// Remove the favourite matching `city`, returning it.
    pub fn remove(&mut self, city: &str) -> Result<Location, WeatherError> {
        let index = self
            .0
            .iter()
            .position(|loc| loc.same_city(city))
            .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

        Ok(self.0.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Location>> for Favourites {
    fn from(locations: Vec<Location>) -> Self {
        let mut favourites = Self::new();
        for loc in locations {
            // Later duplicates are dropped.
            let _ = favourites.add(loc);
        }
        favourites
    }
}

impl<'a> IntoIterator for &'a Favourites {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    fn loc(city: &str, country: &str) -> Location {
        Location {
            city: city.to_string(),
            country: country.to_string(),
            coordinates: Coordinates { lat: 1.0, lon: 2.0 },
        }
    }

    #[test]
    fn add_rejects_duplicate_city_case_insensitive() {
        let mut favs = Favourites::new();
        favs.add(loc("Paris", "FR")).expect("first add succeeds");

        let err = favs.add(loc("PARIS", "US")).unwrap_err();
        assert!(matches!(err, WeatherError::DuplicateFavourite(ref c) if c == "PARIS"));
        assert_eq!(favs.len(), 1);
    }

    #[test]
    fn remove_missing_city_leaves_list_untouched() {
        let mut favs = Favourites::from(vec![loc("Paris", "FR"), loc("Oslo", "NO")]);
        let before = favs.clone();

        let err = favs.remove("Berlin").unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
        assert_eq!(favs, before);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut favs =
            Favourites::from(vec![loc("Paris", "FR"), loc("Oslo", "NO"), loc("Rome", "IT")]);

        let removed = favs.remove("oslo").expect("oslo is a favourite");
        assert_eq!(removed.city, "Oslo");

        let cities: Vec<_> = favs.iter().map(|l| l.city.as_str()).collect();
        assert_eq!(cities, ["Paris", "Rome"]);
    }

    #[test]
    fn from_vec_drops_duplicates() {
        let favs = Favourites::from(vec![loc("Paris", "FR"), loc("paris", "FR")]);
        assert_eq!(favs.len(), 1);
    }
}
