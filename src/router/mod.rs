//! Client-side route table for the app.
//!
//! The same table is resolved under either history strategy; only the
//! translation between browser locations and logical paths differs.
pub mod history;
pub mod pattern;

pub use history::{History, HistoryMode};
pub use pattern::RoutePattern;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};

/// Page components a route can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Home,
    Announcement,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home => write!(f, "Home"),
            View::Announcement => write!(f, "Announcement"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub view: View,
}

impl Route {
    pub fn new(path: &str, name: &str, view: View) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            view,
        }
    }
}

/// The application's route table.
pub fn routes() -> Vec<Route> {
    vec![
        Route::new("/", "Home", View::Home),
        Route::new("/announcement/:id", "Announcement", View::Announcement),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub name: String,
    pub view: View,
    pub path: String,
    pub params: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
struct CompiledRoute {
    route: Route,
    pattern: RoutePattern,
}

#[derive(Clone, Debug)]
pub struct Router {
    routes: Vec<CompiledRoute>,
    history: History,
    current: Option<ResolvedRoute>,
}

/// Validate the route table and build a router for the given history.
pub fn build_router(routes: Vec<Route>, history: History) -> Result<Router> {
    let mut paths = HashSet::new();
    let mut names = HashSet::new();
    let mut compiled = Vec::with_capacity(routes.len());

    for route in routes {
        if !paths.insert(route.path.clone()) {
            bail!("Duplicate route path '{}'", route.path);
        }
        if !names.insert(route.name.clone()) {
            bail!("Duplicate route name '{}'", route.name);
        }
        let pattern = RoutePattern::parse(&route.path)?;
        compiled.push(CompiledRoute { route, pattern });
    }

    tracing::debug!(
        "Built router with {} routes using {} history at base {}",
        compiled.len(),
        history.mode(),
        history.base()
    );

    Ok(Router {
        routes: compiled,
        history,
        current: None,
    })
}

impl Router {
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    /// Resolve a logical path (not a browser location) to a route.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes.iter().find_map(|compiled| {
            compiled.pattern.matches(path).map(|params| ResolvedRoute {
                name: compiled.route.name.clone(),
                view: compiled.route.view,
                path: path.to_string(),
                params,
            })
        })
    }

    /// Navigate to a browser location. A location that matches nothing
    /// leaves the router without a current route.
    pub fn navigate(&mut self, location: &str) -> Option<&ResolvedRoute> {
        self.current = self
            .history
            .location_path(location)
            .and_then(|path| self.resolve(&path));
        if self.current.is_none() {
            tracing::debug!("No route matched location {}", location);
        }
        self.current.as_ref()
    }

    /// Browser location for a named route.
    pub fn href(&self, name: &str, params: &BTreeMap<String, String>) -> Result<String> {
        let compiled = self
            .routes
            .iter()
            .find(|c| c.route.name == name)
            .ok_or_else(|| anyhow!("No route named '{}'", name))?;
        let path = compiled.pattern.render(params)?;
        Ok(self.history.create_href(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_router(history: History) -> Router {
        build_router(routes(), history).unwrap()
    }

    #[test]
    fn it_resolves_home() {
        let router = app_router(History::hash("/"));
        let resolved = router.resolve("/").unwrap();
        assert_eq!(resolved.view, View::Home);
        assert_eq!(resolved.name, "Home");
        assert!(resolved.params.is_empty());
    }

    #[test]
    fn it_resolves_announcement_with_id() {
        let router = app_router(History::hash("/"));
        let resolved = router.resolve("/announcement/42").unwrap();
        assert_eq!(resolved.view, View::Announcement);
        assert_eq!(resolved.params.get("id").map(String::as_str), Some("42"));
        assert!(router.resolve("/announcement/42/").is_some());
        assert!(router.resolve("//announcement//42").is_none());
        assert!(router.resolve("/announcement//42").is_none());
        assert!(router.resolve("/missing").is_none());
    }

    #[test]
    fn it_rejects_duplicate_paths_and_names() {
        let dup_path = vec![
            Route::new("/", "Home", View::Home),
            Route::new("/", "Other", View::Home),
        ];
        assert!(build_router(dup_path, History::hash("/")).is_err());

        let dup_name = vec![
            Route::new("/", "Home", View::Home),
            Route::new("/home", "Home", View::Home),
        ];
        assert!(build_router(dup_name, History::hash("/")).is_err());
    }

    #[test]
    fn it_resolves_the_same_view_under_either_history() {
        let mut hash = app_router(History::hash("/app"));
        let mut web = app_router(History::web("/app"));
        for path in ["/", "/announcement/9", "/nowhere"] {
            let hash_href = hash.history().create_href(path);
            let web_href = web.history().create_href(path);
            let via_hash = hash.navigate(&hash_href).cloned();
            let via_web = web.navigate(&web_href).cloned();
            assert_eq!(via_hash, via_web);
            assert_eq!(via_hash, hash.resolve(path));
        }
    }

    #[test]
    fn it_tracks_the_current_route() {
        let mut router = app_router(History::web("/"));
        assert!(router.current().is_none());
        router.navigate("/announcement/3");
        assert_eq!(router.current().unwrap().view, View::Announcement);
        router.navigate("/unknown");
        assert!(router.current().is_none());
    }

    #[test]
    fn it_does_not_navigate_outside_the_hash_base() {
        let mut router = app_router(History::hash("/app"));
        assert!(router.navigate("/app/#/announcement/1").is_some());
        assert!(router.navigate("/other/#/announcement/1").is_none());
        assert!(router.current().is_none());
    }

    #[test]
    fn it_builds_hrefs_that_navigate_back() {
        let mut router = app_router(History::hash("/app"));
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "5".to_string());
        let href = router.href("Announcement", &params).unwrap();
        assert_eq!(href, "/app#/announcement/5");
        assert_eq!(router.navigate(&href).unwrap().params["id"], "5");
        assert!(router.href("Missing", &params).is_err());
        assert!(router.href("Announcement", &BTreeMap::new()).is_err());
    }
}
