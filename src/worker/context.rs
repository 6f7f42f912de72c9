//! Platform services available to the worker.
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use super::payload::Notification;

/// The worker's global scope: notification display, window management,
/// and the lifecycle controls of the registration.
#[async_trait]
pub trait WorkerContext: Send + Sync {
    async fn show_notification(&self, notification: &Notification) -> Result<()>;

    fn close_notification(&self, notification: &Notification);

    async fn open_window(&self, url: &str) -> Result<()>;

    async fn skip_waiting(&self) -> Result<()>;

    async fn claim_clients(&self) -> Result<()>;
}

/// Side effects observed by a [`RecordingContext`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Shown(Notification),
    Closed(Notification),
    OpenedWindow { url: String },
    SkippedWaiting,
    ClaimedClients,
}

/// A context that records every call instead of touching a platform. Used
/// to preview what the worker would do and in tests.
#[derive(Debug, Default)]
pub struct RecordingContext {
    effects: Mutex<Vec<Effect>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, effect: Effect) {
        match self.effects.lock() {
            Ok(mut effects) => effects.push(effect),
            Err(poisoned) => poisoned.into_inner().push(effect),
        }
    }

    pub fn effects(&self) -> Vec<Effect> {
        match self.effects.lock() {
            Ok(effects) => effects.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::Shown(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn opened_windows(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::OpenedWindow { url } => Some(url),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl WorkerContext for RecordingContext {
    async fn show_notification(&self, notification: &Notification) -> Result<()> {
        self.record(Effect::Shown(notification.clone()));
        Ok(())
    }

    fn close_notification(&self, notification: &Notification) {
        self.record(Effect::Closed(notification.clone()));
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        self.record(Effect::OpenedWindow {
            url: url.to_string(),
        });
        Ok(())
    }

    async fn skip_waiting(&self) -> Result<()> {
        self.record(Effect::SkippedWaiting);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<()> {
        self.record(Effect::ClaimedClients);
        Ok(())
    }
}
