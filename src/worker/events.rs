use std::future::Future;

use anyhow::Result;
use futures::future::{BoxFuture, try_join_all};
use serde::Serialize;

use super::payload::Notification;

/// An event that can extend the worker's lifetime until its pending tasks
/// complete.
#[derive(Default)]
pub struct ExtendableEvent {
    pending: Vec<BoxFuture<'static, Result<()>>>,
}

impl ExtendableEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the worker alive until `task` finishes.
    pub fn wait_until<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.pending.push(Box::pin(task));
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Await every pending task. The host must not tear the worker down
    /// before this resolves.
    pub async fn settle(self) -> Result<()> {
        try_join_all(self.pending).await?;
        Ok(())
    }
}

pub struct PushEvent {
    pub data: Option<Vec<u8>>,
    pub extendable: ExtendableEvent,
}

impl PushEvent {
    pub fn new(data: Option<Vec<u8>>) -> Self {
        Self {
            data,
            extendable: ExtendableEvent::new(),
        }
    }
}

pub struct NotificationClickEvent {
    pub notification: Notification,
    pub extendable: ExtendableEvent,
}

impl NotificationClickEvent {
    pub fn new(notification: Notification) -> Self {
        Self {
            notification,
            extendable: ExtendableEvent::new(),
        }
    }
}

/// A page request passing through the worker.
pub struct FetchEvent {
    pub url: String,
}

impl FetchEvent {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

/// How the worker answered a fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FetchResponse {
    /// Served from the precache entry stored under `cache_key`
    Precache { cache_key: String },
    /// Left to the network
    Network { url: String },
}

/// Events the host delivers to the worker.
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(FetchEvent),
    Push(PushEvent),
    NotificationClick(NotificationClickEvent),
}

impl WorkerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Push(_) => "push",
            WorkerEvent::NotificationClick(_) => "notificationclick",
        }
    }
}
