//! Router for previewing service worker behaviour
//!
//! Runs the worker's handlers against a recording context, so clients can
//! see exactly which notification a payload turns into.

use std::sync::{Arc, RwLock};

use axum::{Json, Router, body::Bytes, extract::State};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::worker::{
    Effect, NotificationClickEvent, PushEvent, RecordingContext, handle_notification_click,
    handle_push,
};

type SharedState = Arc<RwLock<AppState>>;

async fn preview_push(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<public::Notification>, ApiError> {
    let policy = state
        .read()
        .expect("Unable to read share state")
        .config
        .payload_policy;

    // An empty body is a push without data
    let data = (!body.is_empty()).then(|| body.to_vec());
    let recorder = Arc::new(RecordingContext::new());
    let mut event = PushEvent::new(data);
    handle_push(recorder.clone(), &mut event, policy)?;
    event.extendable.settle().await?;

    let notification = recorder
        .shown()
        .pop()
        .ok_or_else(|| anyhow::anyhow!("Push handler did not show a notification"))?;
    Ok(Json(notification))
}

async fn preview_click(
    Json(notification): Json<public::Notification>,
) -> Result<Json<public::ClickResponse>, ApiError> {
    let recorder = Arc::new(RecordingContext::new());
    let mut event = NotificationClickEvent::new(notification);
    handle_notification_click(recorder.clone(), &mut event);
    event.extendable.settle().await?;

    let effects = recorder.effects();
    let closed = effects.iter().any(|e| matches!(e, Effect::Closed(_)));
    let opened = recorder.opened_windows().pop();
    Ok(Json(public::ClickResponse { closed, opened }))
}

/// Create the worker router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/push", axum::routing::post(preview_push))
        .route("/notificationclick", axum::routing::post(preview_click))
}
