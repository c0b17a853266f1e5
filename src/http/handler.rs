//! HTTP handlers for the City Buddies API

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::cities::{BuddyMatch, City, CityBuddies, CityError, EntityId};
use crate::routes::{page_title, resolve_path, ResolvedRoute};
use crate::sparql::Record;

/// Shared state of all handlers
pub struct AppState {
    pub buddies: CityBuddies,
}

pub type SharedState = Arc<AppState>;

impl IntoResponse for CityError {
    fn into_response(self) -> Response {
        let status = match &self {
            CityError::NotFound(_) => StatusCode::NOT_FOUND,
            CityError::InvalidEntityId(_) => StatusCode::BAD_REQUEST,
            CityError::Service(_)
            | CityError::MissingBinding { .. }
            | CityError::InvalidPopulation(_) => StatusCode::BAD_GATEWAY,
        };
        if status != StatusCode::NOT_FOUND {
            warn!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Request for executing a raw SPARQL query
#[derive(Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct LabelResponse {
    pub id: EntityId,
    pub label: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub outcome: &'static str,
    pub cities: Vec<City>,
}

#[derive(Deserialize)]
pub struct TitleParams {
    pub path: String,
}

#[derive(Serialize)]
pub struct TitleResponse {
    pub route: ResolvedRoute,
    pub title: String,
}

/// Handler for raw SPARQL queries
pub async fn query_handler(
    State(state): State<SharedState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Vec<Record>>, CityError> {
    Ok(Json(state.buddies.submit(&payload.query).await?))
}

/// Handler for entity labels
pub async fn label_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<LabelResponse>, CityError> {
    let id: EntityId = id.parse()?;
    let label = state.buddies.id_to_label(&id).await?;
    Ok(Json(LabelResponse { id, label }))
}

/// Handler for city search
pub async fn search_handler(
    State(state): State<SharedState>,
    Path(label): Path<String>,
) -> Result<Json<SearchResponse>, CityError> {
    let outcome = state.buddies.search(&label).await?;
    Ok(Json(SearchResponse {
        outcome: outcome.kind(),
        cities: outcome.cities().to_vec(),
    }))
}

/// Handler for population buddies
pub async fn match_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<BuddyMatch>, CityError> {
    let id: EntityId = id.parse()?;
    Ok(Json(state.buddies.find_buddy(&id).await?))
}

/// Handler for resolving a page path and its title
pub async fn title_handler(
    State(state): State<SharedState>,
    Query(params): Query<TitleParams>,
) -> impl IntoResponse {
    let route = resolve_path(&params.path);
    let title = page_title(&route, &state.buddies).await;
    Json(TitleResponse { route, title })
}
