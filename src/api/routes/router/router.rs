//! Router for the client-side route table API

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State},
};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

async fn resolve(
    State(state): State<SharedState>,
    Query(params): Query<public::ResolveParams>,
) -> Result<Json<public::ResolvedRoute>, ApiError> {
    // Navigate a copy so concurrent requests don't share a current route
    let mut router = state.read().expect("Unable to read share state").router.clone();
    let resolved = router
        .navigate(&params.location)
        .cloned()
        .ok_or_else(|| ApiError::not_found(&format!("No route for {}", params.location)))?;
    Ok(Json(resolved))
}

async fn href(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<public::HrefResponse>, ApiError> {
    let href = state
        .read()
        .expect("Unable to read share state")
        .router
        .href(&name, &params)
        .map_err(|e| ApiError::new(http::StatusCode::BAD_REQUEST, e))?;
    Ok(Json(public::HrefResponse { name, href }))
}

/// Create the router API router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/resolve", axum::routing::get(resolve))
        .route("/href/{name}", axum::routing::get(href))
}
