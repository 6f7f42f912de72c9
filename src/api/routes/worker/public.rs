//! Public types for the worker preview API
use serde::{Deserialize, Serialize};

pub use crate::worker::{Effect, Notification, NotificationOptions};

#[derive(Serialize, Deserialize)]
pub struct ClickResponse {
    pub closed: bool,
    pub opened: Option<String>,
}
