//! City Buddies
//!
//! Find the city whose population is closest to yours, with live data from
//! the Wikidata query service.
//!
//! # Architecture
//!
//! - [`sparql`]: submits SPARQL to a Wikibase endpoint and flattens the
//!   typed JSON bindings into plain [`sparql::Record`]s. The
//!   [`sparql::SparqlClient`] trait is the seam between the operations and
//!   the transport.
//! - [`cities`]: label lookup, search with disambiguation, buddy matching.
//! - [`routes`]: the front end's page table, direct-link redirects and
//!   page titles.
//! - [`http`]: JSON API over the above.
//! - [`config`]: service and server configuration (YAML + environment).
//!
//! ## Example Usage
//!
//! ```rust
//! use city_buddies::cities::CityBuddies;
//! use city_buddies::sparql::{Record, StaticClient};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = StaticClient::new()
//!     .on("wd:Q60", vec![Record::from_iter([("cityLabel", "New York City")])]);
//! let buddies = CityBuddies::new(Arc::new(client), "en");
//!
//! let label = buddies.id_to_label(&"Q60".parse().unwrap()).await.unwrap();
//! assert_eq!(label, "New York City");
//! # }
//! ```

pub mod cities;
pub mod config;
pub mod http;
pub mod routes;
pub mod sparql;

pub use cities::{BuddyMatch, City, CityBuddies, CityError, CityResult, EntityId, SearchOutcome};
pub use config::{AppConfig, ConfigError, ServerConfig, ServiceConfig};
pub use http::HttpServer;
pub use sparql::{Record, ServiceError, ServiceResult, SparqlClient, StaticClient, WikidataClient};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
