//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use webnotify::api::AppState;
use webnotify::api::app;
use webnotify::core::AppConfig;
use webnotify::core::db::initialize_db;
use webnotify::router::{History, HistoryMode, build_router, routes};
use webnotify::worker::PayloadPolicy;

/// Config pointing at `static_dir` with no VAPID key, so nothing is ever
/// sent to a real push service.
pub fn test_config(static_dir: &str, history_mode: HistoryMode) -> AppConfig {
    AppConfig {
        db_path: String::from(":memory:"),
        static_dir: static_dir.to_string(),
        vapid_key_path: None,
        base_url: String::from("/"),
        history_mode,
        payload_policy: PayloadPolicy::Lenient,
        precache_manifest_path: None,
    }
}

/// Creates a test application backed by an in-memory database.
pub async fn test_app_with_config(config: AppConfig) -> Router {
    let db = tokio_rusqlite::Connection::open_in_memory()
        .await
        .expect("Failed to open in-memory db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let history = History::new(config.history_mode, &config.base_url);
    let router = build_router(routes(), history).expect("Invalid route table");
    let app_state = AppState::new(db, config, router);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn test_app() -> Router {
    test_app_with_config(test_config("./dist", HistoryMode::Hash)).await
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
