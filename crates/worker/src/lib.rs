//! The Sanctum Cafe offline worker.
//!
//! Event-driven service worker logic for the cafe PWA: lifecycle
//! transitions over a versioned cache, request routing with per-branch
//! caching strategies, push notification composition and click dispatch,
//! and deferred sync of orders submitted while offline.
//!
//! The worker itself is host-agnostic: all I/O goes through the boundary
//! traits in `sanctum-core` (network, connectivity) and this crate's
//! [`notify::ClientWindows`] / [`notify::NotificationHost`].

pub mod events;
pub mod lifecycle;
pub mod notify;
pub mod router;
pub mod sync;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use events::{Event, InboundMessage, NavigateContext, OutboundMessage, VersionReply};
pub use notify::{
    ClickedNotification, ClientWindows, Notification, NotificationAction, NotificationData, NotificationHost,
    NotificationKind, OrderData, PushPayload, WindowHandle,
};
pub use worker::{ServiceWorker, WorkerState};
