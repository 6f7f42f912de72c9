use std::collections::BTreeMap;

use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed route path such as `/announcement/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

// Segments of an absolute path. A single trailing slash is allowed; a
// repeated leading slash or an empty inner segment is not a valid path.
fn split_segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.starts_with('/') {
        return None;
    }
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Some(Vec::new());
    }

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

impl RoutePattern {
    pub fn parse(path: &str) -> Result<Self> {
        let Some(parts) = split_segments(path) else {
            bail!("Route path '{}' must start with '/' and have no empty segments", path);
        };

        let mut segments = Vec::new();
        for part in parts {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    bail!("Route path '{}' has an unnamed parameter", path);
                }
                if segments.contains(&Segment::Param(name.to_string())) {
                    bail!("Route path '{}' repeats parameter '{}'", path, name);
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Static(part.to_string()));
            }
        }
        Ok(Self { segments })
    }

    /// Match a logical path, returning the decoded parameters on success.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let parts = split_segments(path)?;
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = urlencoding::decode(part).ok()?.into_owned();
                    params.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }

    /// Fill the parameters back into the pattern.
    pub fn render(&self, params: &BTreeMap<String, String>) -> Result<String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        path.push_str(&urlencoding::encode(value))
                    }
                    _ => bail!("Missing required param '{}'", name),
                },
            }
        }
        Ok(path)
    }
}
