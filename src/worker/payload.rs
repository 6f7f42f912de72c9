use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "WebNotifyApp";
pub const DEFAULT_BODY: &str = "New notification";
pub const DEFAULT_URL: &str = "/";
pub const NOTIFICATION_ICON: &str = "/pwa-192x192.png";

/// What to do when push data is not valid JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadPolicy {
    /// Log and show a notification built from the defaults
    #[default]
    Lenient,
    /// Fail the push handler
    Strict,
}

/// Wire format of a push message. Every field is optional and blank values
/// fall back to the defaults when the notification is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PushMessage {
    pub fn new(title: Option<&str>, body: Option<&str>, url: Option<&str>) -> Self {
        Self {
            title: title.map(String::from),
            body: body.map(String::from),
            url: url.map(String::from),
        }
    }

    /// Parse the raw data attached to a push event. Only a JSON syntax
    /// error is subject to `policy`; a field with an unusable value falls
    /// back to its default on its own.
    pub fn parse(data: Option<&[u8]>, policy: PayloadPolicy) -> Result<Self> {
        let Some(data) = data else {
            return Ok(Self::default());
        };

        let value = match serde_json::from_slice::<Value>(data) {
            Ok(value) => value,
            Err(e) => {
                return match policy {
                    PayloadPolicy::Strict => {
                        Err(e).context("Push event data is not a valid JSON payload")
                    }
                    PayloadPolicy::Lenient => {
                        tracing::warn!("Ignoring malformed push payload: {}", e);
                        Ok(Self::default())
                    }
                };
            }
        };

        let Value::Object(fields) = value else {
            tracing::debug!("Push payload is not a JSON object, using defaults");
            return Ok(Self::default());
        };

        Ok(Self {
            title: fields.get("title").and_then(field_text),
            body: fields.get("body").and_then(field_text),
            url: fields.get("url").and_then(field_text),
        })
    }
}

// Falsy values (null, "", 0, false) and nested objects yield no text
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    // The URL to open when the notification is clicked
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub options: NotificationOptions,
}

impl From<PushMessage> for Notification {
    fn from(message: PushMessage) -> Self {
        Self {
            title: or_default(message.title, DEFAULT_TITLE),
            options: NotificationOptions {
                body: or_default(message.body, DEFAULT_BODY),
                icon: NOTIFICATION_ICON.to_string(),
                badge: NOTIFICATION_ICON.to_string(),
                data: or_default(message.url, DEFAULT_URL),
            },
        }
    }
}
