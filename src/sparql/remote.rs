//! WikidataClient: SPARQL over HTTP GET
//!
//! Connects to a Wikibase query service (query.wikidata.org by default).

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info};

use super::request::sparql_query_url;
use super::results::{simplify_for_instance, RawResults, Record};
use super::{ServiceError, ServiceResult, SparqlClient};
use crate::config::ServiceConfig;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Network client for a Wikibase SPARQL endpoint.
///
/// Each `submit` is one independent GET; the inner `reqwest::Client`
/// pools connections, so a single instance can be shared across tasks.
pub struct WikidataClient {
    instance: String,
    sparql_endpoint: String,
    http_client: Client,
}

impl WikidataClient {
    /// Create a client from service configuration.
    ///
    /// # Example
    /// ```no_run
    /// # use city_buddies::sparql::WikidataClient;
    /// # use city_buddies::config::ServiceConfig;
    /// let client = WikidataClient::new(&ServiceConfig::default()).unwrap();
    /// ```
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ServiceError::Transport)?;

        Ok(Self {
            instance: config.instance.trim_end_matches('/').to_string(),
            sparql_endpoint: config.sparql_endpoint.clone(),
            http_client,
        })
    }

    /// Wikibase instance the queried entities live in. Only entity URIs
    /// of this instance are shortened to bare IDs.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn sparql_endpoint(&self) -> &str {
        &self.sparql_endpoint
    }

    /// Execute the GET and decode the results envelope
    async fn fetch(&self, sparql: &str) -> ServiceResult<RawResults> {
        let url = sparql_query_url(&self.sparql_endpoint, sparql);

        let response = self.http_client.get(&url)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ServiceError::Transport)?;

        if !status.is_success() {
            return Err(ServiceError::Status { status, body });
        }

        debug!("SPARQL endpoint returned {} bytes", body.len());
        let raw: RawResults = serde_json::from_str(&body).map_err(ServiceError::Decode)?;
        if !raw.has_answer() {
            return Err(ServiceError::Malformed { body });
        }
        Ok(raw)
    }
}

#[async_trait]
impl SparqlClient for WikidataClient {
    async fn submit(&self, sparql: &str) -> ServiceResult<Vec<Record>> {
        info!("submit query called with sparql: {}", sparql);
        let raw = self.fetch(sparql).await?;
        Ok(simplify_for_instance(&raw, &self.instance))
    }
}
