//! Worker state and the event loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use url::Url;

use sanctum_core::{CacheDb, Connectivity, Error, Network, WorkerConfig};

use crate::events::{Event, InboundMessage, VersionReply};
use crate::notify::{ClientWindows, NotificationHost};

/// Lifecycle phase of a worker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, no lifecycle event handled yet.
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

/// The service worker: configuration, cache handle, and host boundaries.
///
/// All methods take `&self`; handlers for different events may run
/// concurrently on the same instance.
pub struct ServiceWorker {
    pub(crate) config: WorkerConfig,
    pub(crate) cache: CacheDb,
    pub(crate) network: Arc<dyn Network>,
    pub(crate) connectivity: Arc<dyn Connectivity>,
    pub(crate) windows: Arc<dyn ClientWindows>,
    pub(crate) notifications: Arc<dyn NotificationHost>,
    origin: Url,
    state: Mutex<WorkerState>,
    skip_waiting: AtomicBool,
}

impl ServiceWorker {
    /// Wire up a worker against its host boundaries.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` when the configured origin is not a
    /// parseable URL.
    pub fn new(
        config: WorkerConfig,
        cache: CacheDb,
        network: Arc<dyn Network>,
        connectivity: Arc<dyn Connectivity>,
        windows: Arc<dyn ClientWindows>,
        notifications: Arc<dyn NotificationHost>,
    ) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin)
            .map_err(|e| Error::InvalidUrl(format!("origin {}: {e}", config.origin)))?;

        Ok(Self {
            config,
            cache,
            network,
            connectivity,
            windows,
            notifications,
            origin,
            state: Mutex::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_state(&self, next: WorkerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    pub(crate) fn origin(&self) -> &Url {
        &self.origin
    }

    /// Whether immediate activation has been requested.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::Relaxed)
    }

    pub(crate) fn request_skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::Relaxed);
        tracing::info!("skip waiting requested");
    }

    /// Handle a message from the foreground application.
    pub fn on_message(&self, message: InboundMessage, reply: Option<oneshot::Sender<VersionReply>>) {
        tracing::debug!(?message, "message received");
        match message {
            InboundMessage::SkipWaiting => self.request_skip_waiting(),
            InboundMessage::GetVersion => {
                if let Some(reply) = reply {
                    let _ = reply.send(VersionReply { version: self.config.version.clone() });
                }
            }
        }
    }

    /// Drive the worker from a stream of runtime events.
    ///
    /// Fetch events are spawned so concurrent requests proceed in parallel
    /// and race on cache writes last-write-wins; everything else is handled
    /// in arrival order. Returns when the event channel closes.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<Event>) {
        while let Some(event) = events.recv().await {
            match event {
                Event::Fetch { request, reply } => {
                    let worker = Arc::clone(&self);
                    tokio::spawn(async move {
                        // The requester may have gone away; that aborts
                        // nothing already started.
                        let _ = reply.send(worker.handle_fetch(request).await);
                    });
                }
                Event::Install => self.on_install().await,
                Event::Activate => {
                    if let Err(err) = self.on_activate().await {
                        tracing::error!(%err, "activation failed");
                    }
                }
                Event::Push { payload } => self.on_push(payload.as_deref()).await,
                Event::NotificationClick { action, notification } => {
                    self.on_notification_click(action.as_deref(), notification).await;
                }
                Event::Sync { tag } => self.on_sync(&tag).await,
                Event::Message { message, reply } => self.on_message(message, reply),
            }
        }
    }
}
