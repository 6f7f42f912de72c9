use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::router::Router;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Immutable route table used to answer resolve and href requests
    pub router: Router,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig, router: Router) -> Self {
        Self { db, config, router }
    }
}
