use std::sync::Arc;

use anyhow::Result;

use super::context::WorkerContext;
use super::events::{FetchEvent, FetchResponse, NotificationClickEvent, PushEvent};
use super::payload::{Notification, PayloadPolicy, PushMessage};
use super::precache::Precache;

/// Answer precached requests from the cache and send the rest to the
/// network.
pub fn handle_fetch(precache: &dyn Precache, event: &FetchEvent) -> FetchResponse {
    match precache.lookup(&event.url) {
        Some(cache_key) => FetchResponse::Precache { cache_key },
        None => FetchResponse::Network {
            url: event.url.clone(),
        },
    }
}

/// Show a notification built from the push data.
pub fn handle_push(
    context: Arc<dyn WorkerContext>,
    event: &mut PushEvent,
    policy: PayloadPolicy,
) -> Result<()> {
    let message = PushMessage::parse(event.data.as_deref(), policy)?;
    let notification = Notification::from(message);
    tracing::debug!(
        "Showing notification '{}' linking to {}",
        notification.title,
        notification.options.data
    );

    event.extendable.wait_until(async move {
        context.show_notification(&notification).await
    });
    Ok(())
}

/// Close the clicked notification and open a window at its URL.
pub fn handle_notification_click(context: Arc<dyn WorkerContext>, event: &mut NotificationClickEvent) {
    context.close_notification(&event.notification);

    let url = event.notification.options.data.clone();
    tracing::debug!("Notification clicked, opening {}", url);
    event
        .extendable
        .wait_until(async move { context.open_window(&url).await });
}
