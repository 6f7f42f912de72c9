use std::env;

use anyhow::{Context, Result};

use crate::router::HistoryMode;
use crate::worker::{PayloadPolicy, PrecacheManifest};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    pub static_dir: String,
    // Push sending is disabled until a VAPID private key is configured
    pub vapid_key_path: Option<String>,
    pub base_url: String,
    pub history_mode: HistoryMode,
    pub payload_policy: PayloadPolicy,
    // Build-time precache manifest, a JSON array of `{url, revision}`
    pub precache_manifest_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("WEBNOTIFY_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let static_dir = env::var("WEBNOTIFY_STATIC_DIR").unwrap_or("./dist".to_string());
        let vapid_key_path = env::var("WEBNOTIFY_VAPID_KEY_PATH").ok();
        let precache_manifest_path = env::var("WEBNOTIFY_PRECACHE_MANIFEST").ok();
        let base_url = env::var("WEBNOTIFY_BASE_URL").unwrap_or("/".to_string());
        let history_mode = match env::var("WEBNOTIFY_HISTORY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to hash history", e);
                HistoryMode::Hash
            }),
            Err(_) => HistoryMode::Hash,
        };
        let payload_policy = match env::var("WEBNOTIFY_STRICT_PUSH_PAYLOAD").as_deref() {
            Ok("1") | Ok("true") => PayloadPolicy::Strict,
            _ => PayloadPolicy::Lenient,
        };

        Self {
            db_path,
            static_dir,
            vapid_key_path,
            base_url,
            history_mode,
            payload_policy,
            precache_manifest_path,
        }
    }
}

impl AppConfig {
    /// The injected precache manifest, empty when none is configured.
    pub fn precache_manifest(&self) -> Result<PrecacheManifest> {
        match &self.precache_manifest_path {
            Some(path) => PrecacheManifest::from_path(path)
                .with_context(|| format!("Failed to load precache manifest {}", path)),
            None => Ok(PrecacheManifest::default()),
        }
    }
}
