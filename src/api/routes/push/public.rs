//! Public types for the push API
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct PushSubscriptionRequest {
    pub endpoint: String,
    pub keys: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct PushUnsubscribeRequest {
    pub endpoint: String,
}

/// Same shape as the payload the service worker receives.
#[derive(Deserialize, Default)]
pub struct NotificationRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
}
