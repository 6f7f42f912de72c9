use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, header};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::AppState;
use crate::core::{AppConfig, db::migrated_db};
use crate::router::{History, HistoryMode, build_router, routes as app_routes};

// The service worker script and app shell must always be revalidated so a
// new deploy is picked up
async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    let cors = CorsLayer::permissive();
    let (static_dir, history_mode, base) = {
        let state = shared_state.read().expect("Unable to read share state");
        let history = state.router.history();
        (
            state.config.static_dir.clone(),
            history.mode(),
            history.base().to_string(),
        )
    };

    let static_layer = ServiceBuilder::new().layer(middleware::from_fn(set_static_cache_control));
    let static_app: Router = match history_mode {
        // Deep links are real paths, so unknown paths get the app shell
        HistoryMode::Web => {
            let index = Path::new(&static_dir).join("index.html");
            Router::new().fallback_service(
                static_layer.service(
                    ServeDir::new(&static_dir)
                        .precompressed_br()
                        .precompressed_gzip()
                        .fallback(ServeFile::new(index)),
                ),
            )
        }
        HistoryMode::Hash => Router::new().fallback_service(
            static_layer.service(
                ServeDir::new(&static_dir)
                    .precompressed_br()
                    .precompressed_gzip(),
            ),
        ),
    };

    let router = Router::new()
        // API routes
        .nest("/api", routes::router());

    // The built app lives under the deployed base path
    let router = if base == "/" {
        router.fallback_service(static_app)
    } else {
        router.nest_service(&base, static_app)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

pub fn init_tracing() {
    // Ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing();

    let db = migrated_db(&config.db_path)
        .await
        .context("Failed to connect to async db")?;
    let history = History::new(config.history_mode, &config.base_url);
    let router = build_router(app_routes(), history)?;

    let app_state = AppState::new(db, config.clone(), router);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::debug!(
        "Server started. Listening on {} serving {} with {} history",
        listener.local_addr()?,
        config.static_dir,
        config.history_mode
    );
    if config.vapid_key_path.is_none() {
        tracing::warn!("WEBNOTIFY_VAPID_KEY_PATH is not set, push sending is disabled");
    }

    axum::serve(listener, app).await?;
    Ok(())
}
