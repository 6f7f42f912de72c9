use std::collections::BTreeMap;

use anyhow::{Result, anyhow};

use crate::router::{History, build_router, routes};

pub fn run(location: &str, history: History) -> Result<()> {
    let mut router = build_router(routes(), history)?;
    let resolved = router
        .navigate(location)
        .ok_or_else(|| anyhow!("No route matches {}", location))?;
    println!("{}", serde_json::to_string_pretty(resolved)?);
    Ok(())
}

pub fn href(name: &str, params: Vec<(String, String)>, history: History) -> Result<()> {
    let router = build_router(routes(), history)?;
    let params: BTreeMap<String, String> = params.into_iter().collect();
    println!("{}", router.href(name, &params)?);
    Ok(())
}

/// Parse a `key=value` command line argument.
pub fn parse_param(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("Expected key=value, got '{}'", arg))
}
