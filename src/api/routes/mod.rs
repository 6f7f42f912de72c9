//! API routes module

pub mod push;
pub mod router;
pub mod worker;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Push subscription and delivery routes
        .nest("/push", push::router())
        // Client-side route table
        .nest("/router", router::router())
        // Service worker previews
        .nest("/worker", worker::router())
}
