pub mod db;
pub mod models;
pub use db::*;
pub use models::*;

use anyhow::{Error, Result};
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushMessageBuilder,
};

use crate::worker::PushMessage;

pub async fn send_push_notification(
    vapid_private_pem_path: String,
    subscription: PushSubscription,
    payload: PushMessage,
) -> Result<(), Error> {
    let subscription_info =
        SubscriptionInfo::new(subscription.endpoint, subscription.p256dh, subscription.auth);

    // Read the VAPID signing material from the PEM file
    let file = std::fs::File::open(vapid_private_pem_path)?;
    let sig_builder = VapidSignatureBuilder::from_pem(file, &subscription_info)?.build()?;

    // The service worker parses this body as its push payload
    let mut builder = WebPushMessageBuilder::new(&subscription_info);
    let content = serde_json::to_string(&payload)?;
    builder.set_payload(ContentEncoding::Aes128Gcm, content.as_bytes());
    builder.set_vapid_signature(sig_builder);
    let message = builder.build()?;

    let client = HyperWebPushClient::new();
    client.send(message).await?;

    Ok(())
}

pub async fn broadcast_push_notification(
    subscriptions: Vec<PushSubscription>,
    vapid_key_path: String,
    payload: PushMessage,
) -> BroadcastReport {
    let mut tasks = tokio::task::JoinSet::new();
    for sub in subscriptions {
        let vapid = vapid_key_path.clone();
        let endpoint = sub.endpoint.clone();
        let payload = payload.clone();
        tasks.spawn(async move { (endpoint, send_push_notification(vapid, sub, payload).await) });
    }

    let mut report = BroadcastReport::default();
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok((_, Ok(()))) => report.sent += 1,
            Ok((endpoint, Err(e))) => {
                tracing::error!("Failed to send push to {}: {}", endpoint, e);
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!("Push task failed: {}", e);
                report.failed += 1;
            }
        }
    }
    report
}
