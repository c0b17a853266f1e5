//! Request URL construction for the SPARQL protocol

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is by JavaScript's `encodeURIComponent`.
/// Query services are used to receiving queries encoded this way.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the GET URL for `sparql` against `endpoint`.
///
/// The query is passed through verbatim; only URL encoding is applied.
pub fn sparql_query_url(endpoint: &str, sparql: &str) -> String {
    format!(
        "{}?format=json&query={}",
        endpoint.trim_end_matches('/'),
        utf8_percent_encode(sparql, COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_url_shape() {
        let url = sparql_query_url("https://query.wikidata.org/sparql", "SELECT ?x {}");
        assert_eq!(
            url,
            "https://query.wikidata.org/sparql?format=json&query=SELECT%20%3Fx%20%7B%7D"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let url = sparql_query_url("http://localhost:9999/sparql/", "ASK {}");
        assert!(url.starts_with("http://localhost:9999/sparql?format=json&query="));
    }

    #[test]
    fn test_component_charset() {
        let url = sparql_query_url("http://h/s", "a-b_c.d!e~f*g'h(i)j&k=l#m\"n");
        let (_, encoded) = url.split_once("query=").unwrap();
        assert_eq!(encoded, "a-b_c.d!e~f*g'h(i)j%26k%3Dl%23m%22n");
    }

    #[test]
    fn test_query_survives_encoding() {
        let query = r#"SELECT DISTINCT ?cityLabel {
                    VALUES ?city { wd:Q60}
                    SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }
                    }"#;
        let url = sparql_query_url("http://h/s", query);
        let (_, encoded) = url.split_once("query=").unwrap();
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\n'));
        assert_eq!(percent_decode_str(encoded).decode_utf8().unwrap(), query);
    }

    #[test]
    fn test_unicode_is_utf8_encoded() {
        let url = sparql_query_url("http://h/s", "\"São Paulo\"");
        assert!(url.ends_with("query=%22S%C3%A3o%20Paulo%22"));
    }
}
