use std::sync::Arc;

use anyhow::{Result, bail};
use serde::Serialize;

use super::context::WorkerContext;
use super::events::{FetchResponse, WorkerEvent};
use super::handlers::{handle_fetch, handle_notification_click, handle_push};
use super::payload::PayloadPolicy;
use super::precache::{Precache, PrecacheManifest};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// The service worker: owns its lifecycle state and dispatches host
/// events to the named handlers.
pub struct ServiceWorker {
    context: Arc<dyn WorkerContext>,
    precache: Arc<dyn Precache>,
    manifest: PrecacheManifest,
    policy: PayloadPolicy,
    state: WorkerState,
}

impl ServiceWorker {
    pub fn new(
        context: Arc<dyn WorkerContext>,
        precache: Arc<dyn Precache>,
        manifest: PrecacheManifest,
        policy: PayloadPolicy,
    ) -> Self {
        Self {
            context,
            precache,
            manifest,
            policy,
            state: WorkerState::Parsed,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    async fn install(&mut self) -> Result<()> {
        if self.state != WorkerState::Parsed {
            bail!("Cannot install a worker in state {:?}", self.state);
        }
        self.state = WorkerState::Installing;

        let result: Result<()> = async {
            self.precache.cleanup_outdated().await?;
            self.precache.precache(&self.manifest).await?;
            // Activate as soon as installed instead of waiting for old clients
            self.context.skip_waiting().await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                self.state = WorkerState::Installed;
                tracing::info!(
                    "Service worker installed with {} precached entries",
                    self.manifest.entries().len()
                );
                Ok(())
            }
            Err(e) => {
                self.state = WorkerState::Redundant;
                Err(e)
            }
        }
    }

    async fn activate(&mut self) -> Result<()> {
        if self.state != WorkerState::Installed {
            bail!("Cannot activate a worker in state {:?}", self.state);
        }
        self.state = WorkerState::Activating;
        self.context.claim_clients().await?;
        self.state = WorkerState::Activated;
        tracing::info!("Service worker activated");
        Ok(())
    }

    /// Run the install and activate phases back to back.
    pub async fn start(&mut self) -> Result<()> {
        self.dispatch(WorkerEvent::Install).await?;
        self.dispatch(WorkerEvent::Activate).await?;
        Ok(())
    }

    /// Deliver an event and wait for everything it asked to be kept alive
    /// for. Only fetch events produce a response.
    pub async fn dispatch(&mut self, event: WorkerEvent) -> Result<Option<FetchResponse>> {
        tracing::debug!("Dispatching {} event", event.name());
        match event {
            WorkerEvent::Install => self.install().await?,
            WorkerEvent::Activate => self.activate().await?,
            WorkerEvent::Fetch(fetch) => {
                // Pages are not controlled until activation
                if self.state != WorkerState::Activated {
                    return Ok(Some(FetchResponse::Network { url: fetch.url }));
                }
                return Ok(Some(handle_fetch(self.precache.as_ref(), &fetch)));
            }
            WorkerEvent::Push(mut push) => {
                self.ensure_active("push")?;
                handle_push(self.context.clone(), &mut push, self.policy)?;
                push.extendable.settle().await?
            }
            WorkerEvent::NotificationClick(mut click) => {
                self.ensure_active("notificationclick")?;
                handle_notification_click(self.context.clone(), &mut click);
                click.extendable.settle().await?
            }
        }
        Ok(None)
    }

    fn ensure_active(&self, event: &str) -> Result<()> {
        if self.state != WorkerState::Activated {
            bail!(
                "Cannot handle {} event, worker is {:?}",
                event,
                self.state
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::context::{Effect, RecordingContext};
    use crate::worker::events::{FetchEvent, NotificationClickEvent, PushEvent};
    use crate::worker::precache::{MemoryPrecache, PrecacheEntry};

    fn worker(recorder: Arc<RecordingContext>, precache: Arc<MemoryPrecache>) -> ServiceWorker {
        let manifest = PrecacheManifest(vec![PrecacheEntry {
            url: "/index.html".to_string(),
            revision: Some("1".to_string()),
        }]);
        ServiceWorker::new(recorder, precache, manifest, PayloadPolicy::Lenient)
    }

    #[tokio::test]
    async fn it_installs_and_activates_immediately() {
        let recorder = Arc::new(RecordingContext::new());
        let precache = Arc::new(MemoryPrecache::new("workbox", "/"));
        precache.open_cache("workbox-precache-old").unwrap();

        let mut sw = worker(recorder.clone(), precache.clone());
        assert_eq!(sw.state(), WorkerState::Parsed);
        sw.start().await.unwrap();

        assert_eq!(sw.state(), WorkerState::Activated);
        assert_eq!(
            recorder.effects(),
            vec![Effect::SkippedWaiting, Effect::ClaimedClients]
        );
        assert_eq!(precache.cache_names(), vec!["workbox-precache-v2-/".to_string()]);
        assert!(precache.lookup("/").is_some());
    }

    #[tokio::test]
    async fn it_rejects_pushes_before_activation() {
        let recorder = Arc::new(RecordingContext::new());
        let precache = Arc::new(MemoryPrecache::new("workbox", "/"));
        let mut sw = worker(recorder.clone(), precache);

        let result = sw.dispatch(WorkerEvent::Push(PushEvent::new(None))).await;
        assert!(result.is_err());
        assert!(recorder.shown().is_empty());
        assert!(sw.dispatch(WorkerEvent::Activate).await.is_err());
    }

    #[tokio::test]
    async fn it_round_trips_push_to_click() {
        let recorder = Arc::new(RecordingContext::new());
        let precache = Arc::new(MemoryPrecache::new("workbox", "/"));
        let mut sw = worker(recorder.clone(), precache);
        sw.start().await.unwrap();

        let data = br#"{"title":"New","body":"Read it","url":"/#/announcement/8"}"#.to_vec();
        sw.dispatch(WorkerEvent::Push(PushEvent::new(Some(data))))
            .await
            .unwrap();
        let notification = recorder.shown().remove(0);

        sw.dispatch(WorkerEvent::NotificationClick(NotificationClickEvent::new(
            notification,
        )))
        .await
        .unwrap();
        assert_eq!(recorder.opened_windows(), vec!["/#/announcement/8".to_string()]);
    }

    #[tokio::test]
    async fn it_routes_fetches_through_the_injected_manifest() {
        let recorder = Arc::new(RecordingContext::new());
        let precache = Arc::new(MemoryPrecache::new("workbox", "/"));
        let mut sw = worker(recorder, precache);

        let fetch = |url: &str| WorkerEvent::Fetch(FetchEvent::new(url));
        assert_eq!(
            sw.dispatch(fetch("/")).await.unwrap(),
            Some(FetchResponse::Network {
                url: "/".to_string()
            })
        );

        sw.start().await.unwrap();
        assert_eq!(
            sw.dispatch(fetch("/")).await.unwrap(),
            Some(FetchResponse::Precache {
                cache_key: "/index.html?__WB_REVISION__=1".to_string()
            })
        );
        assert_eq!(
            sw.dispatch(fetch("/assets/missing.js")).await.unwrap(),
            Some(FetchResponse::Network {
                url: "/assets/missing.js".to_string()
            })
        );
        assert_eq!(
            sw.dispatch(WorkerEvent::Push(PushEvent::new(None))).await.unwrap(),
            None
        );
    }
}
