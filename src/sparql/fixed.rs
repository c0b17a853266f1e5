//! StaticClient: in-process SPARQL client answering from canned records
//!
//! No network. Queries are matched against substring rules in the order the
//! rules were added; a query no rule matches gets an empty result set.
//! Ideal for tests and offline demos.

use async_trait::async_trait;
use std::sync::Mutex;

use super::results::Record;
use super::{ServiceError, ServiceResult, SparqlClient};

enum Reply {
    Rows(Vec<Record>),
    Unavailable,
}

struct Rule {
    pattern: String,
    reply: Reply,
}

#[derive(Default)]
pub struct StaticClient {
    rules: Vec<Rule>,
    submitted: Mutex<Vec<String>>,
}

impl StaticClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `pattern` with `records`
    pub fn on(mut self, pattern: &str, records: Vec<Record>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            reply: Reply::Rows(records),
        });
        self
    }

    /// Fail queries containing `pattern` with a 503 from the endpoint
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            reply: Reply::Unavailable,
        });
        self
    }

    /// Every query submitted so far, oldest first
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SparqlClient for StaticClient {
    async fn submit(&self, sparql: &str) -> ServiceResult<Vec<Record>> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(sparql.to_string());
        }

        match self.rules.iter().find(|rule| sparql.contains(&rule.pattern)) {
            Some(Rule { reply: Reply::Rows(records), .. }) => Ok(records.clone()),
            Some(Rule { reply: Reply::Unavailable, .. }) => Err(ServiceError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "stubbed outage".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
