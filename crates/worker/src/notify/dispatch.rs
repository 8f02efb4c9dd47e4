//! Notification click routing.
//!
//! Closes the clicked notification, resolves a target in-app URL from the
//! pressed action (falling back to the notification's kind for bare
//! clicks), then reconciles against open windows: the first focusable
//! window at the app origin gets focused and messaged; otherwise a new
//! window opens at the target.

use sanctum_core::Error;

use crate::events::{NavigateContext, OutboundMessage};
use crate::notify::{ClickedNotification, NotificationData, NotificationKind, OrderData};
use crate::worker::ServiceWorker;

impl ServiceWorker {
    /// Handle user interaction with a displayed notification.
    ///
    /// The close happens unconditionally first; anything failing past that
    /// point is logged and swallowed.
    pub async fn on_notification_click(&self, action: Option<&str>, notification: ClickedNotification) {
        tracing::debug!(?action, tag = ?notification.tag, "notification clicked");

        if let Err(err) = self.notifications.close(notification.tag.as_deref()).await {
            tracing::warn!(%err, "failed to close notification");
        }

        if let Err(err) = self.dispatch_click(action, &notification.data).await {
            tracing::error!(%err, "error handling notification click");
        }
    }

    async fn dispatch_click(&self, action: Option<&str>, data: &NotificationData) -> Result<(), Error> {
        let Some(target) = self.resolve_click_target(action, data) else {
            tracing::debug!("notification dismissed");
            return Ok(());
        };
        tracing::info!(url = %target, "routing notification click");

        for window in self.windows.enumerate().await? {
            if window.url.origin() != self.origin().origin() || !window.focusable {
                continue;
            }

            // Focus the first matching window and let the foreground
            // router navigate without a reload.
            self.windows.focus(window.id).await?;
            let message = OutboundMessage::Navigate {
                url: target,
                notification_data: NavigateContext {
                    kind: data.kind,
                    order: data.order.clone(),
                    action: action.map(str::to_string),
                },
            };
            return self.windows.post_message(window.id, message).await;
        }

        self.windows.open_window(&target).await
    }

    /// Compute the in-app URL for an interaction, or None for dismiss.
    ///
    /// Named actions win; a bare or unrecognized click routes by the
    /// notification's kind, then by its stored target URL.
    fn resolve_click_target(&self, action: Option<&str>, data: &NotificationData) -> Option<String> {
        let order_id = data.order.as_ref().and_then(OrderData::order_id);

        match action {
            Some("dismiss") => None,
            Some("view_order") | Some("accept_order") => Some(self.admin_orders_url(order_id)),
            Some("track_order") => Some(self.customer_orders_url(order_id)),
            Some("open_app") => Some("/".to_string()),
            _ => match data.kind {
                NotificationKind::NewOrder => Some(self.admin_orders_url(order_id)),
                NotificationKind::OrderStatus => Some(self.customer_orders_url(order_id)),
                _ if !data.url.is_empty() => Some(data.url.clone()),
                _ => Some("/".to_string()),
            },
        }
    }

    fn admin_orders_url(&self, order_id: Option<&str>) -> String {
        match order_id {
            Some(id) => format!("{}?highlight={id}", self.config.admin_orders_path),
            None => self.config.admin_orders_path.clone(),
        }
    }

    fn customer_orders_url(&self, order_id: Option<&str>) -> String {
        match order_id {
            Some(id) => format!("{}?order={id}", self.config.customer_orders_path),
            None => self.config.customer_orders_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::events::OutboundMessage;
    use crate::notify::{ClickedNotification, NotificationData, NotificationKind, OrderData, WindowHandle};
    use crate::testutil::TestHarness;
    use chrono::Utc;

    fn clicked(kind: NotificationKind, order_id: Option<&str>, url: &str) -> ClickedNotification {
        ClickedNotification {
            tag: Some("order-42".into()),
            data: NotificationData {
                arrived_at: Utc::now(),
                kind,
                order: order_id.map(|id| OrderData { id: Some(id.to_string()), ..Default::default() }),
                timestamp: None,
                url: url.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_click_always_closes_first() {
        let harness = TestHarness::new().await;
        let notification = clicked(NotificationKind::NewOrder, Some("42"), "/admin/orders?highlight=42");

        harness.worker.on_notification_click(Some("dismiss"), notification).await;

        assert_eq!(harness.notifications.closed(), vec![Some("order-42".to_string())]);
    }

    #[tokio::test]
    async fn test_dismiss_opens_nothing() {
        let harness = TestHarness::new().await;
        harness.windows.add_window(1, harness.url("/"), true);

        let notification = clicked(NotificationKind::NewOrder, Some("42"), "/admin/orders?highlight=42");
        harness.worker.on_notification_click(Some("dismiss"), notification).await;

        assert!(harness.windows.focused().is_empty());
        assert!(harness.windows.opened().is_empty());
        assert!(harness.windows.messages().is_empty());
    }

    #[tokio::test]
    async fn test_bare_click_order_status_opens_customer_view() {
        let harness = TestHarness::new().await;

        let notification = clicked(NotificationKind::OrderStatus, Some("7"), "/customer/orders?order=7");
        harness.worker.on_notification_click(None, notification).await;

        assert_eq!(harness.windows.opened(), vec!["/customer/orders?order=7".to_string()]);
    }

    #[tokio::test]
    async fn test_action_click_focuses_existing_window() {
        let harness = TestHarness::new().await;
        harness.windows.add_window(1, harness.url("/menu"), true);

        let notification = clicked(NotificationKind::NewOrder, Some("42"), "/admin/orders?highlight=42");
        harness.worker.on_notification_click(Some("view_order"), notification).await;

        assert_eq!(harness.windows.focused(), vec![1]);
        assert!(harness.windows.opened().is_empty());

        let messages = harness.windows.messages();
        assert_eq!(messages.len(), 1);
        let (id, OutboundMessage::Navigate { url, notification_data }) = &messages[0];
        assert_eq!(*id, 1);
        assert_eq!(url, "/admin/orders?highlight=42");
        assert_eq!(notification_data.action.as_deref(), Some("view_order"));
    }

    #[tokio::test]
    async fn test_only_first_matching_window_is_used() {
        let harness = TestHarness::new().await;
        harness.windows.add_window(1, harness.url("/"), true);
        harness.windows.add_window(2, harness.url("/menu"), true);

        let notification = clicked(NotificationKind::OrderStatus, Some("7"), "/customer/orders?order=7");
        harness.worker.on_notification_click(Some("track_order"), notification).await;

        assert_eq!(harness.windows.focused(), vec![1]);
        assert_eq!(harness.windows.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_origin_window_is_skipped() {
        let harness = TestHarness::new().await;
        harness
            .windows
            .add_window(1, url::Url::parse("https://example.com/").unwrap(), true);

        let notification = clicked(NotificationKind::NewOrder, Some("3"), "/admin/orders?highlight=3");
        harness.worker.on_notification_click(None, notification).await;

        assert!(harness.windows.focused().is_empty());
        assert_eq!(harness.windows.opened(), vec!["/admin/orders?highlight=3".to_string()]);
    }

    #[tokio::test]
    async fn test_unfocusable_window_is_skipped() {
        let harness = TestHarness::new().await;
        harness.windows.add_window(1, harness.url("/"), false);

        let notification = clicked(NotificationKind::NewOrder, None, "/admin/orders");
        harness.worker.on_notification_click(Some("accept_order"), notification).await;

        assert_eq!(harness.windows.opened(), vec!["/admin/orders".to_string()]);
    }

    #[tokio::test]
    async fn test_open_app_and_unknown_action_targets() {
        let harness = TestHarness::new().await;

        let notification = clicked(NotificationKind::General, None, "/promo");
        harness.worker.on_notification_click(Some("open_app"), notification).await;
        assert_eq!(harness.windows.opened(), vec!["/".to_string()]);

        // An unrecognized action falls back to the stored data URL.
        let notification = clicked(NotificationKind::General, None, "/promo");
        harness.worker.on_notification_click(Some("share"), notification).await;
        assert_eq!(harness.windows.opened(), vec!["/".to_string(), "/promo".to_string()]);
    }
}
