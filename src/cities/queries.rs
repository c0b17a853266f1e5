//! SPARQL text for the city operations
//!
//! Every query projects the same variable names so rows can be read back
//! by one decoder (`?city ?cityLabel ?cityDescription ?countryLabel
//! ?population`).

use super::models::EntityId;

/// wd:Q515: city
pub const CITY_CLASS: &str = "Q515";

/// Which neighbour in population order to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbour {
    /// Smallest population at or above the target's
    Above,
    /// Largest population at or below the target's
    Below,
}

/// Escape `value` for use inside a double-quoted SPARQL string literal
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Reduce a configured language to a valid language tag, `en` if nothing is left
pub fn language_tag(language: &str) -> String {
    let tag: String = language
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if tag.is_empty() {
        "en".to_string()
    } else {
        tag
    }
}

fn label_service(language: &str) -> String {
    format!(
        r#"SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{}". }}"#,
        language
    )
}

/// Label of a single entity, as `?cityLabel`
pub fn label_query(id: &EntityId, language: &str) -> String {
    format!(
        "SELECT DISTINCT ?cityLabel {{\n  VALUES ?city {{ wd:{} }}\n  {}\n}}",
        id,
        label_service(language)
    )
}

/// Cities whose label equals `label` in `language`
pub fn search_query(label: &str, language: &str) -> String {
    format!(
        r#"SELECT DISTINCT ?city ?cityLabel ?cityDescription ?countryLabel ?population WHERE {{
  ?city rdfs:label "{label}"@{language} ;
        wdt:P31/wdt:P279* wd:{class} ;
        wdt:P1082 ?population .
  OPTIONAL {{ ?city wdt:P17 ?country . }}
  {service}
}}"#,
        label = escape_literal(label),
        language = language,
        class = CITY_CLASS,
        service = label_service(language),
    )
}

/// One city with its label and population. Entities that are not
/// instances of a city class give no rows.
pub fn city_query(id: &EntityId, language: &str) -> String {
    format!(
        r#"SELECT ?city ?cityLabel ?cityDescription ?countryLabel ?population WHERE {{
  VALUES ?city {{ wd:{id} }}
  ?city wdt:P31/wdt:P279* wd:{class} ;
        wdt:P1082 ?population .
  OPTIONAL {{ ?city wdt:P17 ?country . }}
  {service}
}}"#,
        id = id,
        class = CITY_CLASS,
        service = label_service(language),
    )
}

/// Population statements of one entity
pub fn population_query(id: &EntityId) -> String {
    format!("SELECT ?population WHERE {{\n  wd:{} wdt:P1082 ?population .\n}}", id)
}

/// Nearest other city above or below `population`
pub fn neighbour_query(id: &EntityId, population: u64, side: Neighbour, language: &str) -> String {
    let (op, order) = match side {
        Neighbour::Above => (">=", "ASC"),
        Neighbour::Below => ("<=", "DESC"),
    };
    format!(
        r#"SELECT ?city ?cityLabel ?cityDescription ?countryLabel ?population WHERE {{
  ?city wdt:P31/wdt:P279* wd:{class} ;
        wdt:P1082 ?population .
  FILTER(?population {op} {population} && ?city != wd:{id})
  OPTIONAL {{ ?city wdt:P17 ?country . }}
  {service}
}}
ORDER BY {order}(?population)
LIMIT 1"#,
        class = CITY_CLASS,
        op = op,
        population = population,
        id = id,
        service = label_service(language),
        order = order,
    )
}
