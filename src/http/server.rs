//! HTTP server for the City Buddies API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handler::{
    label_handler, match_handler, query_handler, search_handler, title_handler, AppState,
};
use crate::cities::CityBuddies;
use crate::config::ServerConfig;

/// HTTP server exposing the city operations as JSON
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, buddies: CityBuddies) -> Self {
        Self {
            config,
            state: Arc::new(AppState { buddies }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/query", post(query_handler))
            .route("/api/label/:id", get(label_handler))
            .route("/api/search/:label", get(search_handler))
            .route("/api/match/:id", get(match_handler))
            .route("/api/title", get(title_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.state))
    }

    /// Bind and serve until the process stops
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("City Buddies API listening on http://{}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
