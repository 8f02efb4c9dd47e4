//! Shared mocks for exercising the worker against scripted hosts.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use sanctum_core::{CacheDb, Connectivity, Error, Network, Request, Response, WorkerConfig};

use crate::events::OutboundMessage;
use crate::notify::{ClientWindows, Notification, NotificationHost, WindowHandle};
use crate::worker::ServiceWorker;

/// Scripted network: responses are registered per URL; anything else, or
/// anything marked failing, errors like a dropped connection.
#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, Response>>,
    failing: Mutex<HashSet<String>>,
    fail_nth: Mutex<HashMap<String, u32>>,
    counters: Mutex<HashMap<String, u32>>,
    fail_all: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockNetwork {
    pub fn respond(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    /// Fail only the nth (1-based) fetch of a URL.
    pub fn fail_nth(&self, url: &str, nth: u32) {
        self.fail_nth.lock().unwrap().insert(url.to_string(), nth);
    }

    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::Relaxed);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push(format!("{} {url}", request.method));

        let count = {
            let mut counters = self.counters.lock().unwrap();
            let count = counters.entry(url.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if self.fail_all.load(Ordering::Relaxed)
            || self.failing.lock().unwrap().contains(&url)
            || self.fail_nth.lock().unwrap().get(&url) == Some(&count)
        {
            return Err(Error::FetchFailed(format!("connection refused: {url}")));
        }

        self.routes
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or_else(|| Error::FetchFailed(format!("no route for {url}")))
    }
}

/// Settable connectivity flag.
pub struct OnlineFlag {
    online: AtomicBool,
}

impl Default for OnlineFlag {
    fn default() -> Self {
        Self { online: AtomicBool::new(true) }
    }
}

impl OnlineFlag {
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Connectivity for OnlineFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

/// Window registry that records focus, messaging, and open calls.
#[derive(Default)]
pub struct RecordingWindows {
    windows: Mutex<Vec<WindowHandle>>,
    focused: Mutex<Vec<u64>>,
    messages: Mutex<Vec<(u64, OutboundMessage)>>,
    opened: Mutex<Vec<String>>,
    pub claimed: AtomicBool,
}

impl RecordingWindows {
    pub fn add_window(&self, id: u64, url: Url, focusable: bool) {
        self.windows.lock().unwrap().push(WindowHandle { id, url, focusable });
    }

    pub fn focused(&self) -> Vec<u64> {
        self.focused.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(u64, OutboundMessage)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientWindows for RecordingWindows {
    async fn enumerate(&self) -> Result<Vec<WindowHandle>, Error> {
        Ok(self.windows.lock().unwrap().clone())
    }

    async fn focus(&self, id: u64) -> Result<(), Error> {
        self.focused.lock().unwrap().push(id);
        Ok(())
    }

    async fn post_message(&self, id: u64, message: OutboundMessage) -> Result<(), Error> {
        self.messages.lock().unwrap().push((id, message));
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), Error> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn claim(&self) -> Result<(), Error> {
        self.claimed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// Notification surface that records shows and closes.
#[derive(Default)]
pub struct RecordingNotifications {
    shown: Mutex<Vec<Notification>>,
    closed: Mutex<Vec<Option<String>>>,
    fail_show: AtomicBool,
}

impl RecordingNotifications {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<Option<String>> {
        self.closed.lock().unwrap().clone()
    }

    pub fn fail_show(&self) {
        self.fail_show.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl NotificationHost for RecordingNotifications {
    async fn show(&self, notification: &Notification) -> Result<(), Error> {
        if self.fail_show.load(Ordering::Relaxed) {
            return Err(Error::FetchFailed("display surface unavailable".into()));
        }
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn close(&self, tag: Option<&str>) -> Result<(), Error> {
        self.closed.lock().unwrap().push(tag.map(str::to_string));
        Ok(())
    }
}

/// A worker wired to in-memory storage and recording mocks.
pub struct TestHarness {
    pub worker: Arc<ServiceWorker>,
    pub network: Arc<MockNetwork>,
    pub connectivity: Arc<OnlineFlag>,
    pub windows: Arc<RecordingWindows>,
    pub notifications: Arc<RecordingNotifications>,
}

impl TestHarness {
    pub async fn new() -> Self {
        let config = WorkerConfig::default();
        let cache = CacheDb::open_in_memory().await.unwrap();
        let network = Arc::new(MockNetwork::default());
        let connectivity = Arc::new(OnlineFlag::default());
        let windows = Arc::new(RecordingWindows::default());
        let notifications = Arc::new(RecordingNotifications::default());

        let worker = Arc::new(
            ServiceWorker::new(
                config,
                cache,
                network.clone(),
                connectivity.clone(),
                windows.clone(),
                notifications.clone(),
            )
            .unwrap(),
        );

        Self { worker, network, connectivity, windows, notifications }
    }

    /// Resolve an app-relative path against the test origin.
    pub fn url(&self, path: &str) -> Url {
        self.worker.config().page_url(path).unwrap()
    }

    /// Seed the current store with a response for a request.
    pub async fn cache_put(&self, request: &Request, response: &Response) {
        self.worker
            .cache
            .put(&self.worker.config().version, request, response)
            .await
            .unwrap();
    }

    /// Current-store lookup for a request.
    pub async fn cache_match(&self, request: &Request) -> Option<Response> {
        self.worker
            .cache
            .match_request(&self.worker.config().version, request)
            .await
            .unwrap()
    }

    /// Register a 200 response for every configured precache asset.
    pub fn stub_precache_assets(&self) {
        for path in &self.worker.config().precache_urls {
            self.network
                .respond(self.url(path).as_str(), Response::ok("text/plain", format!("asset {path}")));
        }
    }
}
