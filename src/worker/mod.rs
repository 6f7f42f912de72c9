//! Service worker logic: precache lifecycle and push notifications.
//!
//! Platform APIs are reached only through [`WorkerContext`] and
//! [`Precache`], so every handler can run outside a browser.
pub mod context;
pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod payload;
pub mod precache;

pub use context::{Effect, RecordingContext, WorkerContext};
pub use events::{
    ExtendableEvent, FetchEvent, FetchResponse, NotificationClickEvent, PushEvent, WorkerEvent,
};
pub use handlers::{handle_fetch, handle_notification_click, handle_push};
pub use lifecycle::{ServiceWorker, WorkerState};
pub use payload::{Notification, NotificationOptions, PayloadPolicy, PushMessage};
pub use precache::{MemoryPrecache, Precache, PrecacheEntry, PrecacheManifest};
