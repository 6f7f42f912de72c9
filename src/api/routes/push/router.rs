//! Router for the push API

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State};
use serde_json::Value;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::notify::{
    PushSubscription, broadcast_push_notification, delete_notification_subscription,
    find_all_notification_subscriptions, upsert_notification_subscription,
};
use crate::worker::PushMessage;

type SharedState = Arc<RwLock<AppState>>;

// Register a client for push notifications
async fn push_subscription(
    State(state): State<SharedState>,
    Json(subscription): Json<public::PushSubscriptionRequest>,
) -> Result<Json<Value>, ApiError> {
    let p256dh = subscription
        .keys
        .get("p256dh")
        .ok_or_else(|| ApiError::bad_request("Missing p256dh key"))?
        .clone();
    let auth = subscription
        .keys
        .get("auth")
        .ok_or_else(|| ApiError::bad_request("Missing auth key"))?
        .clone();

    let db = state.read().unwrap().db.clone();
    upsert_notification_subscription(
        &db,
        PushSubscription {
            endpoint: subscription.endpoint,
            p256dh,
            auth,
        },
    )
    .await?;

    Ok(Json(serde_json::json!({"success": true})))
}

// Remove a client's subscription
async fn push_unsubscribe(
    State(state): State<SharedState>,
    Json(request): Json<public::PushUnsubscribeRequest>,
) -> Result<Json<Value>, ApiError> {
    let db = state.read().unwrap().db.clone();
    let removed = delete_notification_subscription(&db, request.endpoint).await?;
    Ok(Json(serde_json::json!({"success": true, "removed": removed})))
}

// Endpoint to send push notification to all subscriptions
async fn send_notification(
    State(state): State<SharedState>,
    Json(payload): Json<public::NotificationRequest>,
) -> Result<Json<public::NotificationResponse>, ApiError> {
    let (db, vapid_key_path) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.db.clone(),
            shared_state.config.vapid_key_path.clone(),
        )
    };

    let subscriptions = find_all_notification_subscriptions(&db).await?;
    if subscriptions.is_empty() {
        tracing::debug!("No push subscriptions, nothing to send");
        return Ok(Json(public::NotificationResponse {
            success: true,
            sent: 0,
            failed: 0,
        }));
    }

    let Some(vapid_key_path) = vapid_key_path else {
        return Err(anyhow::anyhow!("Push sending requires WEBNOTIFY_VAPID_KEY_PATH").into());
    };

    let message = PushMessage {
        title: payload.title,
        body: payload.body,
        url: payload.url,
    };
    let report = broadcast_push_notification(subscriptions, vapid_key_path, message).await;

    // The broadcast itself ran; individual delivery failures are counted
    Ok(Json(public::NotificationResponse {
        success: true,
        sent: report.sent,
        failed: report.failed,
    }))
}

/// Create the push router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/subscribe",
            axum::routing::post(push_subscription).delete(push_unsubscribe),
        )
        .route("/notification", axum::routing::post(send_notification))
}
