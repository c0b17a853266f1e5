//! HTTP API tests over a StaticClient (no network)

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use city_buddies::sparql::{Record, StaticClient};
use city_buddies::{CityBuddies, HttpServer, ServerConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn row(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

fn app() -> Router {
    let client = StaticClient::new()
        .fail_on("wd:Q13")
        .on("SELECT DISTINCT ?cityLabel", vec![row(&[("cityLabel", "New York City")])])
        .on("VALUES ?city { wd:Q60 }", vec![
            row(&[("city", "Q60"), ("cityLabel", "New York City"), ("countryLabel", "United States"), ("population", "8804190")]),
        ])
        .on("ORDER BY DESC", vec![
            row(&[("city", "Q84"), ("cityLabel", "London"), ("countryLabel", "United Kingdom"), ("population", "8799800")]),
        ])
        .on(r#""Springfield"@en"#, vec![
            row(&[("city", "Q28515"), ("cityLabel", "Springfield"), ("population", "114394")]),
            row(&[("city", "Q28514"), ("cityLabel", "Springfield"), ("population", "169176")]),
        ])
        .on(r#""New York City"@en"#, vec![
            row(&[("city", "Q60"), ("cityLabel", "New York City"), ("population", "8804190")]),
        ])
        .on("?item", vec![row(&[("item", "Q1")]), row(&[("item", "Q2")])]);

    let buddies = CityBuddies::new(Arc::new(client), "en");
    HttpServer::new(ServerConfig::default(), buddies).router()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn test_raw_query() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": "SELECT ?item {}" }).to_string()))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "item": "Q1" }, { "item": "Q2" }]));
}

#[tokio::test]
async fn test_raw_query_service_failure() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": "ASK { wd:Q13 ?p ?o }" }).to_string()))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("(from sparql) "));
}

#[tokio::test]
async fn test_label() {
    let (status, body) = get("/api/label/Q60").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "Q60", "label": "New York City" }));

    let (status, body) = get("/api/label/Gotham").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Gotham"));
}

#[tokio::test]
async fn test_search() {
    let (status, body) = get("/api/search/Springfield").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "ambiguous");
    assert_eq!(body["cities"].as_array().unwrap().len(), 2);

    let (_, body) = get("/api/search/New%20York%20City").await;
    assert_eq!(body["outcome"], "unique");
    assert_eq!(body["cities"][0]["id"], "Q60");
    assert_eq!(body["cities"][0]["population"], 8804190);

    let (status, body) = get("/api/search/Atlantis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "not_found", "cities": [] }));
}

#[tokio::test]
async fn test_match() {
    let (status, body) = get("/api/match/Q60").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target"]["label"], "New York City");
    assert_eq!(body["buddy"]["label"], "London");
    assert_eq!(body["buddy"]["country"], "United Kingdom");
    assert_eq!(body["difference"], 4390);
}

#[tokio::test]
async fn test_match_unknown_city() {
    let (status, body) = get("/api/match/Q999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Not found"));
}

#[tokio::test]
async fn test_titles() {
    let (status, body) = get("/api/title?path=/about").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "About | City Buddies");
    assert_eq!(body["route"]["name"], "about");

    let (_, body) = get("/api/title?path=/disambiguation/Springfield").await;
    assert_eq!(body["route"]["name"], "search");
    assert_eq!(body["route"]["redirected_from"], "disambiguation");
    assert_eq!(body["route"]["params"]["targetLabel"], "Springfield");
    assert_eq!(body["title"], "Springfield | City Buddies");

    let (_, body) = get("/api/title?path=/match/Q60").await;
    assert_eq!(body["route"]["name"], "match-redirect");
    assert_eq!(body["title"], "City Buddies");

    let (_, body) = get("/api/title?path=/nowhere").await;
    assert_eq!(body["route"]["name"], "404");
    assert_eq!(body["title"], "404 | City Buddies");
}
