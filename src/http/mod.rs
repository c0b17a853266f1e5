//! JSON API over the city operations
//!
//! - `POST /api/query`: raw SPARQL, simplified records back
//! - `GET /api/label/:id`: entity label
//! - `GET /api/search/:label`: cities with that label
//! - `GET /api/match/:id`: population buddy
//! - `GET /api/title?path=...`: route and page title for a front-end path

pub mod handler;
pub mod server;

pub use server::HttpServer;
