//! Data models for cities and buddy matches

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::CityError;

/// A Wikidata item ID such as `Q60`.
///
/// Only validated IDs are ever interpolated into a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

fn item_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Q[1-9][0-9]*$").expect("static regex"))
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntityId {
    type Err = CityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        if item_id().is_match(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(CityError::InvalidEntityId(s.to_string()))
        }
    }
}

impl TryFrom<String> for EntityId {
    type Error = CityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A city with a known population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: EntityId,
    pub label: String,
    /// Short Wikidata description, used to tell same-named cities apart
    pub description: Option<String>,
    pub country: Option<String>,
    pub population: u64,
}

/// Result of searching cities by label
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No city carries the label
    NotFound,
    /// Exactly one city matched
    Unique(City),
    /// Several cities share the label; the user has to pick one
    Ambiguous(Vec<City>),
}

impl SearchOutcome {
    pub fn from_cities(mut cities: Vec<City>) -> Self {
        match cities.len() {
            0 => SearchOutcome::NotFound,
            1 => SearchOutcome::Unique(cities.remove(0)),
            _ => SearchOutcome::Ambiguous(cities),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::NotFound => "not_found",
            SearchOutcome::Unique(_) => "unique",
            SearchOutcome::Ambiguous(_) => "ambiguous",
        }
    }

    pub fn cities(&self) -> &[City] {
        match self {
            SearchOutcome::NotFound => &[],
            SearchOutcome::Unique(city) => std::slice::from_ref(city),
            SearchOutcome::Ambiguous(cities) => cities,
        }
    }
}

/// A city and its population buddy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyMatch {
    pub target: City,
    pub buddy: City,
    /// Absolute population difference
    pub difference: u64,
}

impl BuddyMatch {
    pub fn new(target: City, buddy: City) -> Self {
        let difference = target.population.abs_diff(buddy.population);
        Self { target, buddy, difference }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: &str, population: u64) -> City {
        City {
            id: id.parse().unwrap(),
            label: id.to_string(),
            description: None,
            country: None,
            population,
        }
    }

    #[test]
    fn test_entity_id_parsing() {
        assert_eq!("Q60".parse::<EntityId>().unwrap().as_str(), "Q60");
        assert_eq!(" Q1490 ".parse::<EntityId>().unwrap().as_str(), "Q1490");

        for bad in ["", "Q", "Q0", "60", "q60", "P31", "Q60 }", "Q60; DROP"] {
            assert!(
                matches!(bad.parse::<EntityId>(), Err(CityError::InvalidEntityId(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_entity_id_serde() {
        let id: EntityId = serde_json::from_str("\"Q84\"").unwrap();
        assert_eq!(id.to_string(), "Q84");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Q84\"");
        assert!(serde_json::from_str::<EntityId>("\"London\"").is_err());
    }

    #[test]
    fn test_search_outcome() {
        assert_eq!(SearchOutcome::from_cities(vec![]), SearchOutcome::NotFound);
        assert_eq!(SearchOutcome::NotFound.cities().len(), 0);

        let unique = SearchOutcome::from_cities(vec![city("Q1", 10)]);
        assert_eq!(unique.kind(), "unique");
        assert_eq!(unique.cities()[0].id.as_str(), "Q1");

        let ambiguous = SearchOutcome::from_cities(vec![city("Q1", 10), city("Q2", 20)]);
        assert_eq!(ambiguous.kind(), "ambiguous");
        assert_eq!(ambiguous.cities().len(), 2);
    }

    #[test]
    fn test_buddy_difference() {
        let m = BuddyMatch::new(city("Q1", 100), city("Q2", 130));
        assert_eq!(m.difference, 30);
        let m = BuddyMatch::new(city("Q1", 100), city("Q2", 70));
        assert_eq!(m.difference, 30);
    }
}
