//! Precache of the static assets listed in the build manifest.
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const REVISION_PARAM: &str = "__WB_REVISION__";
const PRECACHE_MARKER: &str = "-precache-";
const DIRECTORY_INDEX: &str = "index.html";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecacheEntry {
    pub url: String,
    #[serde(default)]
    pub revision: Option<String>,
}

impl PrecacheEntry {
    /// Key the entry is stored under. Revisioned entries carry the
    /// revision so a new build replaces the old copy.
    pub fn cache_key(&self) -> String {
        match &self.revision {
            Some(revision) => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}{}={}", self.url, sep, REVISION_PARAM, revision)
            }
            None => self.url.clone(),
        }
    }
}

/// The manifest injected at build time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecacheManifest(pub Vec<PrecacheEntry>);

impl PrecacheManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[PrecacheEntry] {
        &self.0
    }
}

#[async_trait]
pub trait Precache: Send + Sync {
    /// Delete precaches left behind by older worker versions. Returns the
    /// names of the deleted caches.
    async fn cleanup_outdated(&self) -> Result<Vec<String>>;

    /// Store every manifest entry and drop entries no longer listed.
    async fn precache(&self, manifest: &PrecacheManifest) -> Result<()>;

    /// Cache key serving a request for `url`, if precached.
    fn lookup(&self, url: &str) -> Option<String>;
}

/// Cache storage kept in memory: cache name -> (cache key -> url).
#[derive(Debug)]
pub struct MemoryPrecache {
    cache_name: String,
    caches: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl MemoryPrecache {
    pub fn new(prefix: &str, scope: &str) -> Self {
        Self {
            cache_name: format!("{}{}v2-{}", prefix, PRECACHE_MARKER, scope),
            caches: RwLock::new(HashMap::new()),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Create an empty cache, as an older worker version would have left.
    pub fn open_cache(&self, name: &str) -> Result<()> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| anyhow!("Precache lock poisoned"))?;
        caches.entry(name.to_string()).or_default();
        Ok(())
    }

    pub fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .caches
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn cached_keys(&self) -> Vec<String> {
        self.caches
            .read()
            .ok()
            .and_then(|c| c.get(&self.cache_name).map(|e| e.keys().cloned().collect()))
            .unwrap_or_default()
    }

    fn find_url(&self, url: &str) -> Option<String> {
        let caches = self.caches.read().ok()?;
        let entries = caches.get(&self.cache_name)?;
        entries
            .iter()
            .find(|(_, cached_url)| cached_url.as_str() == url)
            .map(|(key, _)| key.clone())
    }
}

#[async_trait]
impl Precache for MemoryPrecache {
    async fn cleanup_outdated(&self) -> Result<Vec<String>> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| anyhow!("Precache lock poisoned"))?;
        let outdated: Vec<String> = caches
            .keys()
            .filter(|name| name.contains(PRECACHE_MARKER) && **name != self.cache_name)
            .cloned()
            .collect();
        for name in &outdated {
            caches.remove(name);
            tracing::info!("Deleted outdated precache {}", name);
        }
        Ok(outdated)
    }

    async fn precache(&self, manifest: &PrecacheManifest) -> Result<()> {
        let mut caches = self
            .caches
            .write()
            .map_err(|_| anyhow!("Precache lock poisoned"))?;
        let cache = caches.entry(self.cache_name.clone()).or_default();

        let wanted: BTreeMap<String, String> = manifest
            .entries()
            .iter()
            .map(|entry| (entry.cache_key(), entry.url.clone()))
            .collect();
        cache.retain(|key, _| wanted.contains_key(key));
        let added = wanted.len() - cache.len();
        cache.extend(wanted);

        tracing::debug!(
            "Precached {} entries ({} new) in {}",
            cache.len(),
            added,
            self.cache_name
        );
        Ok(())
    }

    fn lookup(&self, url: &str) -> Option<String> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if let Some(key) = self.find_url(path) {
            return Some(key);
        }
        if path.ends_with('/') {
            return self.find_url(&format!("{}{}", path, DIRECTORY_INDEX));
        }
        self.find_url(&format!("{}.html", path))
    }
}
