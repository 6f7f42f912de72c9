//! Public types for the router API
use serde::{Deserialize, Serialize};

pub use crate::router::ResolvedRoute;

#[derive(Deserialize)]
pub struct ResolveParams {
    /// Browser location, interpreted with the configured history mode
    pub location: String,
}

#[derive(Serialize, Deserialize)]
pub struct HrefResponse {
    pub name: String,
    pub href: String,
}
