use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How navigation state is represented in the URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Logical path lives in the fragment: `/base/#/announcement/1`
    Hash,
    /// Logical path is the URL path under the base: `/base/announcement/1`
    Web,
}

impl FromStr for HistoryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(HistoryMode::Hash),
            "web" | "html5" | "history" => Ok(HistoryMode::Web),
            other => Err(anyhow!("Unknown history mode '{}'", other)),
        }
    }
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryMode::Hash => write!(f, "hash"),
            HistoryMode::Web => write!(f, "web"),
        }
    }
}

fn normalize_base(base: &str) -> String {
    let base = base.trim();
    let mut normalized = if base.starts_with('/') {
        base.to_string()
    } else {
        format!("/{}", base)
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

// Drops `scheme://host` so absolute URLs and bare paths are handled alike
fn strip_origin(location: &str) -> &str {
    match location.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => location,
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    mode: HistoryMode,
    base: String,
}

impl History {
    pub fn new(mode: HistoryMode, base: &str) -> Self {
        Self {
            mode,
            base: normalize_base(base),
        }
    }

    pub fn hash(base: &str) -> Self {
        Self::new(HistoryMode::Hash, base)
    }

    pub fn web(base: &str) -> Self {
        Self::new(HistoryMode::Web, base)
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Extract the logical route path from a browser location. Returns
    /// `None` for a hash location whose page is not under the base.
    pub fn location_path(&self, location: &str) -> Option<String> {
        let location = strip_origin(location.trim());
        let path = match self.mode {
            HistoryMode::Hash => {
                let (pathname, fragment) = match location.split_once('#') {
                    Some((pathname, fragment)) => (pathname, strip_query(fragment)),
                    None => (location, "/"),
                };
                let pathname = strip_query(pathname);
                // An empty pathname is a fragment-only location on the current page
                if !pathname.is_empty() && self.strip_base(pathname).is_none() {
                    return None;
                }
                fragment
            }
            HistoryMode::Web => {
                let pathname = strip_query(location);
                self.strip_base(pathname).unwrap_or(pathname)
            }
        };

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Some(path)
    }

    // The rest of `pathname` after the base, if it lies under it
    fn strip_base<'a>(&self, pathname: &'a str) -> Option<&'a str> {
        if self.base == "/" {
            return Some(pathname);
        }
        match pathname.strip_prefix(self.base.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }

    /// Build the browser location for a logical route path.
    pub fn create_href(&self, path: &str) -> String {
        match self.mode {
            HistoryMode::Hash => {
                let base = if self.base == "/" { "/" } else { self.base.as_str() };
                format!("{}#{}", base, path)
            }
            HistoryMode::Web => {
                if self.base == "/" {
                    path.to_string()
                } else if path == "/" {
                    self.base.clone()
                } else {
                    format!("{}{}", self.base, path)
                }
            }
        }
    }
}
