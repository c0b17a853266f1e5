//! City search, label lookup and population buddies
//!
//! All operations are built on [`SparqlClient::submit`]: each one renders a
//! query, submits it, and decodes the simplified records into domain types.
//!
//! # Example
//!
//! ```rust,no_run
//! use city_buddies::cities::{CityBuddies, SearchOutcome};
//! use city_buddies::config::ServiceConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let buddies = CityBuddies::from_config(&ServiceConfig::default())?;
//! if let SearchOutcome::Unique(city) = buddies.search("Lisbon").await? {
//!     let m = buddies.find_buddy(&city.id).await?;
//!     println!("{} ~ {}", m.target.label, m.buddy.label);
//! }
//! # Ok(())
//! # }
//! ```

mod models;
pub mod queries;

pub use models::{BuddyMatch, City, EntityId, SearchOutcome};

use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::sparql::{Record, ServiceError, SparqlClient, WikidataClient};
use queries::Neighbour;

/// Errors from the city operations
#[derive(Error, Debug)]
pub enum CityError {
    /// The query subsystem failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The query ran but produced nothing usable
    #[error("Not found: {0}")]
    NotFound(String),

    /// A row lacks a variable the operation depends on
    #[error("Result row is missing binding for ?{variable}")]
    MissingBinding { variable: String },

    #[error("Invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("Invalid population value: {0}")]
    InvalidPopulation(String),
}

pub type CityResult<T> = Result<T, CityError>;

/// Value bound to `variable`, or `MissingBinding`
pub fn require<'a>(record: &'a Record, variable: &str) -> CityResult<&'a str> {
    record.get(variable).ok_or_else(|| CityError::MissingBinding {
        variable: variable.to_string(),
    })
}

/// Parse a `wdt:P1082` literal; decimals are rounded
pub fn parse_population(value: &str) -> CityResult<u64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
        _ => Err(CityError::InvalidPopulation(value.to_string())),
    }
}

/// Decode rows into cities, one per entity, keeping first-seen order.
///
/// An entity repeats when it has several population statements or
/// countries; the first row supplies the labels and the largest population
/// wins.
pub fn cities_from_records(records: &[Record]) -> CityResult<Vec<City>> {
    let mut cities: IndexMap<EntityId, City> = IndexMap::new();

    for record in records {
        let id: EntityId = require(record, "city")?.parse()?;
        let population = parse_population(require(record, "population")?)?;

        match cities.get_mut(&id) {
            Some(city) => city.population = city.population.max(population),
            None => {
                let city = City {
                    label: record.get("cityLabel").unwrap_or(id.as_str()).to_string(),
                    description: record.get("cityDescription").map(str::to_string),
                    country: record.get("countryLabel").map(str::to_string),
                    population,
                    id: id.clone(),
                };
                cities.insert(id, city);
            }
        }
    }

    Ok(cities.into_values().collect())
}

/// The candidate with the smallest population difference; ties go to the larger city
pub fn closest_by_population(population: u64, candidates: impl IntoIterator<Item = City>) -> Option<City> {
    candidates
        .into_iter()
        .min_by_key(|c| (c.population.abs_diff(population), std::cmp::Reverse(c.population)))
}

/// City operations over a shared SPARQL client
#[derive(Clone)]
pub struct CityBuddies {
    client: Arc<dyn SparqlClient>,
    language: String,
}

impl CityBuddies {
    pub fn new(client: Arc<dyn SparqlClient>, language: &str) -> Self {
        Self {
            client,
            language: queries::language_tag(language),
        }
    }

    /// Connect to the configured Wikibase query service
    pub fn from_config(config: &ServiceConfig) -> CityResult<Self> {
        let client = WikidataClient::new(config)?;
        Ok(Self::new(Arc::new(client), &config.language))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Submit a raw query
    pub async fn submit(&self, sparql: &str) -> CityResult<Vec<Record>> {
        Ok(self.client.submit(sparql).await?)
    }

    /// Human-readable label of an entity
    pub async fn id_to_label(&self, id: &EntityId) -> CityResult<String> {
        let records = self.submit(&queries::label_query(id, &self.language)).await?;
        let first = records
            .first()
            .ok_or_else(|| CityError::NotFound(format!("no label for {}", id)))?;
        Ok(require(first, "cityLabel")?.to_string())
    }

    /// Cities whose label matches `label` exactly
    pub async fn search(&self, label: &str) -> CityResult<SearchOutcome> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(SearchOutcome::NotFound);
        }

        let records = self.submit(&queries::search_query(label, &self.language)).await?;
        let cities = cities_from_records(&records)?;
        info!("Search for {:?} matched {} cities", label, cities.len());
        Ok(SearchOutcome::from_cities(cities))
    }

    /// Largest recorded population of an entity
    pub async fn population(&self, id: &EntityId) -> CityResult<u64> {
        let records = self.submit(&queries::population_query(id)).await?;
        let mut largest = None;
        for record in &records {
            let population = parse_population(require(record, "population")?)?;
            largest = Some(largest.map_or(population, |l: u64| l.max(population)));
        }
        largest.ok_or_else(|| CityError::NotFound(format!("no population for {}", id)))
    }

    /// Label and population of one city; other entities are `NotFound`
    pub async fn city(&self, id: &EntityId) -> CityResult<City> {
        let records = self.submit(&queries::city_query(id, &self.language)).await?;
        cities_from_records(&records)?
            .into_iter()
            .next()
            .ok_or_else(|| CityError::NotFound(format!("no city with a population for {}", id)))
    }

    /// The city closest in population to `id`
    pub async fn find_buddy(&self, id: &EntityId) -> CityResult<BuddyMatch> {
        let target = self.city(id).await?;
        debug!("Finding buddy for {} (population {})", target.id, target.population);

        let mut candidates = Vec::new();
        for side in [Neighbour::Above, Neighbour::Below] {
            let query = queries::neighbour_query(id, target.population, side, &self.language);
            let records = self.submit(&query).await?;
            candidates.extend(cities_from_records(&records)?);
        }

        let buddy = closest_by_population(target.population, candidates)
            .ok_or_else(|| CityError::NotFound(format!("no buddy for {}", id)))?;
        info!("Buddy of {} is {}", target.label, buddy.label);
        Ok(BuddyMatch::new(target, buddy))
    }
}
