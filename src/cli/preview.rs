use std::sync::Arc;

use anyhow::Result;

use crate::core::AppConfig;
use crate::worker::{
    FetchEvent, MemoryPrecache, NotificationClickEvent, PayloadPolicy, PrecacheManifest,
    PushEvent, RecordingContext, ServiceWorker, WorkerEvent,
};

/// Run a push (and optionally the click on its notification) through the
/// worker and print every platform call it makes, followed by how the
/// worker answers each fetched URL.
pub async fn run(
    config: &AppConfig,
    data: Option<String>,
    click: bool,
    strict: bool,
    fetch: Vec<String>,
) -> Result<()> {
    let manifest = config.precache_manifest()?;
    let policy = if strict {
        PayloadPolicy::Strict
    } else {
        config.payload_policy
    };
    for line in preview(manifest, policy, data, click, &fetch).await? {
        println!("{}", line);
    }
    Ok(())
}

async fn preview(
    manifest: PrecacheManifest,
    policy: PayloadPolicy,
    data: Option<String>,
    click: bool,
    fetch: &[String],
) -> Result<Vec<String>> {
    let recorder = Arc::new(RecordingContext::new());
    let precache = Arc::new(MemoryPrecache::new("workbox", "/"));
    let mut worker = ServiceWorker::new(recorder.clone(), precache, manifest, policy);
    worker.start().await?;

    let push = PushEvent::new(data.map(String::into_bytes));
    worker.dispatch(WorkerEvent::Push(push)).await?;

    if click && let Some(notification) = recorder.shown().pop() {
        let event = NotificationClickEvent::new(notification);
        worker.dispatch(WorkerEvent::NotificationClick(event)).await?;
    }

    let mut lines = Vec::new();
    for effect in recorder.effects() {
        lines.push(serde_json::to_string(&effect)?);
    }
    for url in fetch {
        let event = WorkerEvent::Fetch(FetchEvent::new(url));
        if let Some(response) = worker.dispatch(event).await? {
            lines.push(serde_json::to_string(&response)?);
        }
    }
    Ok(lines)
}
