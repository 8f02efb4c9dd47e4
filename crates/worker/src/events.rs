//! The worker's event alphabet and cross-context messages.
//!
//! Each variant of [`Event`] corresponds to one hosting-runtime callback.
//! Handlers signal completion by resolving; fetch and version queries reply
//! on oneshot channels, modeling the runtime awaiting `waitUntil`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use sanctum_core::{Error, Request, Response};

use crate::notify::{ClickedNotification, NotificationKind, OrderData};

/// One event delivered by the hosting runtime.
#[derive(Debug)]
pub enum Event {
    /// This worker version is being installed.
    Install,
    /// This worker version is taking over from a previous one.
    Activate,
    /// An outgoing request was intercepted.
    Fetch {
        request: Request,
        reply: oneshot::Sender<Result<Response, Error>>,
    },
    /// A push message arrived. The payload may be absent, JSON, or text.
    Push { payload: Option<Bytes> },
    /// The user interacted with a displayed notification.
    ///
    /// `action` is the pressed button's id, or None for a bare click.
    NotificationClick {
        action: Option<String>,
        notification: ClickedNotification,
    },
    /// Connectivity returned; tagged deferred work may run.
    Sync { tag: String },
    /// A message from the foreground application.
    Message {
        message: InboundMessage,
        reply: Option<oneshot::Sender<VersionReply>>,
    },
}

/// Messages accepted from the foreground application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// Force immediate activation instead of waiting out old instances.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Ask which cache store version this worker serves.
    #[serde(rename = "GET_VERSION")]
    GetVersion,
}

/// Reply to a GET_VERSION message, sent on the event's reply channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionReply {
    pub version: String,
}

/// Messages sent to application windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    /// Ask the foreground router to navigate without a full reload.
    #[serde(rename = "NAVIGATE")]
    Navigate {
        url: String,
        #[serde(rename = "notificationData")]
        notification_data: NavigateContext,
    },
}

/// Notification context attached to a NAVIGATE message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigateContext {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "orderData", skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}
