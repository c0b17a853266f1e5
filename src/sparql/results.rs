//! SPARQL JSON results and their simplified form

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// The `application/sparql-results+json` envelope as sent by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResults {
    #[serde(default)]
    pub head: RawHead,
    /// Absent for ASK queries
    #[serde(default)]
    pub results: Option<RawRows>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

impl RawResults {
    /// True when the envelope carries a SELECT or an ASK answer.
    ///
    /// Any JSON object decodes into `RawResults`, so an error object from
    /// the service only shows up as both fields missing.
    pub fn has_answer(&self) -> bool {
        self.results.is_some() || self.boolean.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRows {
    #[serde(default)]
    pub bindings: Vec<IndexMap<String, RawBinding>>,
}

/// One typed binding: `{"type": "literal", "value": "...", ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBinding {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// A result row with type metadata stripped.
///
/// Keys follow the order of the query's projected variables. A variable
/// left unbound in a row has no key at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, String>);

impl Record {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Plain value bound to `variable` in this row
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.0.insert(variable.into(), value.into());
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn entity_uri() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://([^/]+)/entity/([QPL][1-9][0-9]*)$").expect("static regex")
    })
}

/// Host part of a Wikibase instance URL: `https://www.wikidata.org/` gives
/// `www.wikidata.org`
pub fn instance_host(instance: &str) -> &str {
    let host = instance
        .strip_prefix("https://")
        .or_else(|| instance.strip_prefix("http://"))
        .unwrap_or(instance);
    host.split('/').next().unwrap_or(host)
}

/// Plain value of one binding
pub fn simplify_value(binding: &RawBinding) -> String {
    simplify_binding(binding, None)
}

/// Entity URIs become bare IDs; with `host` set, only those of that host
fn simplify_binding(binding: &RawBinding, host: Option<&str>) -> String {
    if binding.kind == "uri" {
        if let Some(caps) = entity_uri().captures(&binding.value) {
            if host.map_or(true, |h| h.eq_ignore_ascii_case(&caps[1])) {
                return caps[2].to_string();
            }
        }
    }
    binding.value.clone()
}

/// Flatten a results envelope into one [`Record`] per row, in row order.
pub fn simplify(raw: &RawResults) -> Vec<Record> {
    simplify_rows(raw, None)
}

/// Like [`simplify`], but only entity URIs of `instance` are shortened to
/// IDs. Entity URIs of other Wikibase instances are kept whole.
pub fn simplify_for_instance(raw: &RawResults, instance: &str) -> Vec<Record> {
    simplify_rows(raw, Some(instance_host(instance)))
}

fn simplify_rows(raw: &RawResults, host: Option<&str>) -> Vec<Record> {
    let rows = match &raw.results {
        Some(rows) => &rows.bindings,
        None => return Vec::new(),
    };

    let records: Vec<Record> = rows
        .iter()
        .map(|row| {
            let mut record = Record::new();
            for var in &raw.head.vars {
                if let Some(binding) = row.get(var) {
                    record.insert(var.clone(), simplify_binding(binding, host));
                }
            }
            // Bindings for variables missing from head.vars are still kept
            for (var, binding) in row {
                if !record.contains(var) {
                    record.insert(var.clone(), simplify_binding(binding, host));
                }
            }
            record
        })
        .collect();

    debug!("Simplified {} SPARQL result rows", records.len());
    records
}
