use anyhow::{Result, anyhow};

use crate::core::AppConfig;
use crate::core::db::migrated_db;
use crate::notify::{broadcast_push_notification, find_all_notification_subscriptions};
use crate::worker::PushMessage;

pub async fn run(config: &AppConfig, message: PushMessage) -> Result<()> {
    let vapid_key_path = config
        .vapid_key_path
        .clone()
        .ok_or_else(|| anyhow!("Missing env var WEBNOTIFY_VAPID_KEY_PATH"))?;

    let db = migrated_db(&config.db_path).await?;
    let subscriptions = find_all_notification_subscriptions(&db).await?;
    println!("Sending to {} subscriptions...", subscriptions.len());

    let report = broadcast_push_notification(subscriptions, vapid_key_path, message).await;
    println!("Sent {}, failed {}", report.sent, report.failed);
    Ok(())
}
