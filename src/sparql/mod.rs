//! SPARQL query submission against a Wikibase query service
//!
//! A query is an opaque string: it is percent-encoded into the endpoint URL,
//! sent with a single GET, and the `application/sparql-results+json`
//! envelope that comes back is flattened into plain [`Record`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use city_buddies::sparql::{SparqlClient, WikidataClient};
//! use city_buddies::config::ServiceConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WikidataClient::new(&ServiceConfig::default())?;
//! let records = client.submit(r#"
//!     SELECT DISTINCT ?cityLabel {
//!         VALUES ?city { wd:Q60 }
//!         SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
//!     }
//! "#).await?;
//! println!("{:?}", records[0].get("cityLabel"));
//! # Ok(())
//! # }
//! ```

mod fixed;
mod remote;
mod request;
mod results;

pub use fixed::StaticClient;
pub use remote::WikidataClient;
pub use request::sparql_query_url;
pub use results::{
    instance_host, simplify, simplify_for_instance, simplify_value, RawBinding, RawHead, RawResults,
    RawRows, Record,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the query subsystem.
///
/// Every variant renders with the `(from sparql)` prefix. Transport and
/// decode failures keep the underlying error as their source.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request could not be sent or the body could not be read
    #[error("(from sparql) {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("(from sparql) Request failed with status code {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was not a SPARQL JSON results envelope
    #[error("(from sparql) {0}")]
    Decode(#[source] serde_json::Error),

    /// Valid JSON, but carrying neither `results` nor `boolean`
    #[error("(from sparql) Response is not a SPARQL results document")]
    Malformed { body: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Narrow interface over a SPARQL endpoint.
///
/// Implemented by:
/// - `WikidataClient`: HTTP GET against a Wikibase query service
/// - `StaticClient`: canned records, no network (tests, offline demos)
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// Submit a query and return one simplified record per result row
    async fn submit(&self, sparql: &str) -> ServiceResult<Vec<Record>>;
}

#[async_trait]
impl<T: SparqlClient + ?Sized> SparqlClient for std::sync::Arc<T> {
    async fn submit(&self, sparql: &str) -> ServiceResult<Vec<Record>> {
        (**self).submit(sparql).await
    }
}
