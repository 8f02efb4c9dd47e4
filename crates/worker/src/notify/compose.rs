//! Push payload parsing and notification construction.
//!
//! One transition per inbound push event: `payload → typed record →
//! display`. Parse failures degrade to a plain-text body; display failures
//! are logged and swallowed. Nothing on this path is fatal.

use chrono::Utc;

use sanctum_core::WorkerConfig;

use crate::notify::{Notification, NotificationAction, NotificationData, NotificationKind, OrderData, PushPayload};
use crate::worker::ServiceWorker;

pub const DEFAULT_TITLE: &str = "Sanctum Cafe";
pub const DEFAULT_BODY: &str = "New notification from Sanctum Cafe";

const TEST_BODY: &str = "This is a test notification from Sanctum Cafe";
const BASE_VIBRATION: [u32; 5] = [300, 100, 300, 100, 300];

/// Decode a raw push payload.
///
/// JSON decode failure falls back to treating the payload as plain text in
/// the body, keeping default title and kind; a missing payload yields all
/// defaults. Never fails.
pub fn parse_payload(raw: Option<&[u8]>) -> PushPayload {
    let Some(raw) = raw else {
        return PushPayload::default();
    };

    match serde_json::from_slice(raw) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(%err, "push payload is not valid JSON, using text body");
            PushPayload {
                body: Some(String::from_utf8_lossy(raw).into_owned()),
                ..PushPayload::default()
            }
        }
    }
}

/// Build the notification for a decoded payload.
///
/// The `tag` is derived from the order id where one applies, so the host
/// replaces an earlier notification for the same order instead of stacking
/// a duplicate.
pub fn compose(config: &WorkerConfig, payload: &PushPayload) -> Notification {
    let mut notification = Notification {
        title: DEFAULT_TITLE.to_string(),
        body: payload.body.clone().unwrap_or_else(|| DEFAULT_BODY.to_string()),
        tag: None,
        icon: config.notification_icon.clone(),
        badge: config.notification_badge.clone(),
        vibrate: BASE_VIBRATION.to_vec(),
        require_interaction: true,
        silent: false,
        renotify: true,
        actions: Vec::new(),
        data: NotificationData {
            arrived_at: Utc::now(),
            kind: payload.kind,
            order: payload.order.clone(),
            timestamp: payload.timestamp.clone(),
            url: "/".to_string(),
        },
    };

    match payload.kind {
        NotificationKind::NewOrder => {
            let order = payload.order.clone().unwrap_or_default();
            let id = order.order_id().unwrap_or("Unknown");
            let item_count = order.items.as_ref().map_or(0, Vec::len);
            let items_text = if item_count == 1 { "1 item".to_string() } else { format!("{item_count} items") };
            let total = order.total.as_ref().map_or_else(|| "0.00".to_string(), ToString::to_string);

            notification.title = format!("🆕 New Order #{id}");
            notification.body = format!("{} placed an order ({items_text}) for ₹{total}", order.display_customer());
            notification.tag = Some(format!("order-{id}"));
            notification.data.url = format!("{}?highlight={id}", config.admin_orders_path);
            notification.actions = vec![
                action("view_order", "View Order", config),
                action("accept_order", "Accept", config),
                action("dismiss", "Dismiss", config),
            ];
        }

        NotificationKind::OrderStatus => {
            let order = payload.order.clone().unwrap_or_default();
            let id = order.order_id().unwrap_or("Unknown");
            let status = order.status.as_deref().unwrap_or("updated");

            notification.title = format!("📦 Order Update #{id}");
            if payload.body.is_none() {
                notification.body = format!("Your order is now {status}");
            }
            notification.tag = Some(format!("status-{id}"));
            notification.data.url = format!("{}?order={id}", config.customer_orders_path);
            notification.actions = vec![
                action("track_order", "Track Order", config),
                action("dismiss", "OK", config),
            ];
        }

        NotificationKind::Test => {
            notification.title = "🧪 Test Notification".to_string();
            if payload.body.is_none() {
                notification.body = TEST_BODY.to_string();
            }
            notification.tag = Some("test-notification".to_string());
            notification.actions = vec![
                action("open_app", "Open App", config),
                action("dismiss", "Dismiss", config),
            ];
        }

        NotificationKind::General => {
            if let Some(title) = &payload.title {
                notification.title = title.clone();
            }
            notification.actions = vec![
                action("open_app", "Open App", config),
                action("dismiss", "Dismiss", config),
            ];
        }
    }

    notification
}

fn action(id: &str, title: &str, config: &WorkerConfig) -> NotificationAction {
    NotificationAction {
        action: id.to_string(),
        title: title.to_string(),
        icon: config.notification_badge.clone(),
    }
}

impl ServiceWorker {
    /// Handle a push event: parse, compose, display.
    ///
    /// Display is best-effort; a host failure is logged, never propagated.
    pub async fn on_push(&self, payload: Option<&[u8]>) {
        let payload = parse_payload(payload);
        let notification = compose(&self.config, &payload);

        tracing::info!(kind = ?payload.kind, tag = ?notification.tag, "showing notification");
        if let Err(err) = self.notifications.show(&notification).await {
            tracing::error!(%err, "failed to display notification");
        }
    }
}
