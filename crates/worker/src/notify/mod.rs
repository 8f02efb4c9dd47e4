//! Push notification model and host display boundaries.
//!
//! A push event flows `payload → typed record → display`: [`compose`]
//! parses the inbound payload into a [`PushPayload`] and builds a
//! [`Notification`]; [`dispatch`] routes later user interaction with it.

pub mod compose;
pub mod dispatch;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use sanctum_core::Error;

use crate::events::OutboundMessage;

/// Notification category, branched on during composition and click routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    OrderStatus,
    Test,
    /// Anything absent or unrecognized collapses to the general kind.
    #[default]
    #[serde(other)]
    General,
}

/// Decoded push payload.
///
/// Every field is optional; defaults apply at the parse boundary rather
/// than being scattered through the composer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: NotificationKind,

    /// Canonical key is `orderData`; `notificationData` is accepted as a
    /// legacy alias still produced by older senders.
    #[serde(default, rename = "orderData", alias = "notificationData")]
    pub order: Option<OrderData>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Order fields referenced by notifications.
///
/// All optional: senders have shipped both `id` and `_id`, and both flat
/// and nested customer names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,

    #[serde(default, rename = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl OrderData {
    /// Preferred order id: `id`, falling back to legacy `_id`.
    pub fn order_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.legacy_id.as_deref())
    }

    /// Customer display name, flat key over nested, defaulting to
    /// "Customer".
    pub fn display_customer(&self) -> &str {
        self.customer_name
            .as_deref()
            .or_else(|| self.customer.as_ref().and_then(|c| c.name.as_deref()))
            .unwrap_or("Customer")
    }
}

/// Nested customer object shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Order totals arrive as either a preformatted string or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Money {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Money::Text(s) => f.write_str(s),
            Money::Number(n) => write!(f, "{n:.2}"),
        }
    }
}

/// One action button on a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// A fully composed notification, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,

    /// Dedup key: the host replaces an existing notification carrying the
    /// same tag instead of stacking a duplicate.
    pub tag: Option<String>,

    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub require_interaction: bool,
    pub silent: bool,
    pub renotify: bool,
    pub actions: Vec<NotificationAction>,
    pub data: NotificationData,
}

/// Routing metadata carried on a notification so the click handler can act
/// without re-deriving state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub arrived_at: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    #[serde(default, rename = "orderData", skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Target in-app URL computed at composition time.
    pub url: String,
}

/// The notification a click event refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickedNotification {
    pub tag: Option<String>,
    pub data: NotificationData,
}

/// Handle to an open application window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    pub id: u64,
    pub url: Url,
    /// Whether the host allows focusing this window.
    pub focusable: bool,
}

/// Open application windows, as exposed by the hosting runtime.
#[async_trait]
pub trait ClientWindows: Send + Sync {
    /// Every open window, including ones not yet controlled by this worker.
    async fn enumerate(&self) -> Result<Vec<WindowHandle>, Error>;

    async fn focus(&self, id: u64) -> Result<(), Error>;

    async fn post_message(&self, id: u64, message: OutboundMessage) -> Result<(), Error>;

    async fn open_window(&self, url: &str) -> Result<(), Error>;

    /// Take control of all open windows without requiring a reload.
    async fn claim(&self) -> Result<(), Error>;
}

/// Notification display surface.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    async fn show(&self, notification: &Notification) -> Result<(), Error>;

    /// Close a displayed notification. Idempotent.
    async fn close(&self, tag: Option<&str>) -> Result<(), Error>;
}
