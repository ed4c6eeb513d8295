//! Navigation transport seam.
//!
//! The transport owns the displayed URL. It changes it on request and tells
//! its listeners whenever it changed, whether the change came from code, a
//! link the app intercepted, or the history buttons.
//!
//! [`MemoryTransport`] is an in-process transport with a history stack. It
//! backs headless hosts and tests, and records every navigation request so
//! replays and forced reloads can be observed.
//!
//! # Example
//!
//! ```ignore
//! let transport = MemoryTransport::new("/");
//! let _sub = transport.subscribe(Box::new(|event, _cx| {
//!     println!("now at {}", event.location);
//! }));
//! transport.navigate_to("/users", false, cx);
//! ```

use crate::events::{Subscribers, Subscription};
use crate::trace_log;
use gpui::App;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Notification sent after the transport's URL changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationChanged {
    /// New absolute location, including query string and fragment.
    pub location: String,
    /// `true` when the change came from a link the app intercepted rather
    /// than from code or the history buttons.
    pub is_navigation_intercepted: bool,
}

/// The mechanism that changes the displayed URL.
pub trait NavigationTransport: 'static {
    /// Base URI every application route lives under.
    fn base_uri(&self) -> String;

    /// The URL currently displayed.
    fn uri(&self) -> String;

    /// Move to `url`. With `force_load` the application is left for a full
    /// document load and no location-changed notification follows.
    fn navigate_to(&self, url: &str, force_load: bool, cx: &mut App);

    /// Register a location-changed listener. Listeners run in registration
    /// order.
    fn subscribe(&self, listener: Box<dyn Fn(&LocationChanged, &mut App)>) -> Subscription;

    /// Start treating in-app link clicks as client-side navigations.
    fn enable_navigation_interception(&self, _cx: &mut App) {}
}

// ============================================================================
// MemoryTransport
// ============================================================================

/// One call to [`NavigationTransport::navigate_to`] on a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRecord {
    /// Absolute URL requested.
    pub url: String,
    /// Whether a full document load was requested.
    pub force_load: bool,
}

#[derive(Debug)]
struct History {
    entries: Vec<String>,
    current: usize,
}

impl History {
    fn push(&mut self, url: String) {
        self.entries.truncate(self.current + 1);
        self.entries.push(url);
        self.current = self.entries.len() - 1;
    }
}

struct MemoryInner {
    base_uri: String,
    history: RefCell<History>,
    listeners: Subscribers<LocationChanged>,
    navigations: RefCell<Vec<NavigationRecord>>,
    interception_enabled: Cell<bool>,
}

/// In-memory [`NavigationTransport`] with back/forward history.
///
/// Cloning yields another handle to the same transport.
#[derive(Clone)]
pub struct MemoryTransport {
    inner: Rc<MemoryInner>,
}

impl MemoryTransport {
    /// Transport rooted at `/`, currently showing `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_base("/", initial)
    }

    /// Transport rooted at `base_uri` (e.g. `https://app.test/`). Relative
    /// URLs are resolved against it.
    pub fn with_base(base_uri: impl Into<String>, initial: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        let initial = absolutize(&base_uri, &initial.into());
        Self {
            inner: Rc::new(MemoryInner {
                base_uri,
                history: RefCell::new(History {
                    entries: vec![initial],
                    current: 0,
                }),
                listeners: Subscribers::new(),
                navigations: RefCell::new(Vec::new()),
                interception_enabled: Cell::new(false),
            }),
        }
    }

    /// Simulate the user clicking an in-app link.
    ///
    /// Once interception is enabled the click becomes a client-side
    /// navigation flagged as intercepted; before that it is a full load.
    pub fn click_link(&self, url: &str, cx: &mut App) {
        let url = absolutize(&self.inner.base_uri, url);
        if !self.inner.interception_enabled.get() {
            self.record(&url, true);
            self.inner.history.borrow_mut().push(url);
            return;
        }
        self.inner.history.borrow_mut().push(url.clone());
        self.dispatch(url, true, cx);
    }

    /// Simulate the browser back button. Returns `false` at the start of
    /// history.
    pub fn back(&self, cx: &mut App) -> bool {
        let location = {
            let mut history = self.inner.history.borrow_mut();
            if history.current == 0 {
                return false;
            }
            history.current -= 1;
            history.entries[history.current].clone()
        };
        self.dispatch(location, false, cx);
        true
    }

    /// Every `navigate_to` call and pre-interception link click so far.
    pub fn navigations(&self) -> Vec<NavigationRecord> {
        self.inner.navigations.borrow().clone()
    }

    /// Number of requests to load `url` (client-side or full).
    pub fn navigation_count(&self, url: &str) -> usize {
        let url = absolutize(&self.inner.base_uri, url);
        self.inner
            .navigations
            .borrow()
            .iter()
            .filter(|record| record.url == url)
            .count()
    }

    /// Whether the controller enabled link interception.
    pub fn is_interception_enabled(&self) -> bool {
        self.inner.interception_enabled.get()
    }

    /// Number of registered location-changed listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn record(&self, url: &str, force_load: bool) {
        self.inner.navigations.borrow_mut().push(NavigationRecord {
            url: url.to_string(),
            force_load,
        });
    }

    fn dispatch(&self, location: String, is_navigation_intercepted: bool, cx: &mut App) {
        let event = LocationChanged {
            location,
            is_navigation_intercepted,
        };
        let delivered = self.inner.listeners.notify(&event, cx);
        trace_log!(
            "Location changed to '{}' (intercepted: {}), {} listener(s)",
            event.location,
            event.is_navigation_intercepted,
            delivered
        );
    }
}

impl NavigationTransport for MemoryTransport {
    fn base_uri(&self) -> String {
        self.inner.base_uri.clone()
    }

    fn uri(&self) -> String {
        let history = self.inner.history.borrow();
        history.entries[history.current].clone()
    }

    fn navigate_to(&self, url: &str, force_load: bool, cx: &mut App) {
        let url = absolutize(&self.inner.base_uri, url);
        self.record(&url, force_load);
        self.inner.history.borrow_mut().push(url.clone());
        if !force_load {
            self.dispatch(url, false, cx);
        }
    }

    fn subscribe(&self, listener: Box<dyn Fn(&LocationChanged, &mut App)>) -> Subscription {
        self.inner
            .listeners
            .insert(move |event, cx| listener(event, cx))
    }

    fn enable_navigation_interception(&self, _cx: &mut App) {
        self.inner.interception_enabled.set(true);
    }
}

impl fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("base_uri", &self.inner.base_uri)
            .field("history", &self.inner.history.borrow())
            .field("interception_enabled", &self.inner.interception_enabled.get())
            .finish_non_exhaustive()
    }
}

/// Resolve `url` against `base_uri` unless it is already absolute.
fn absolutize(base_uri: &str, url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    let base = base_uri.trim_end_matches('/');
    format!("{}/{}", base, url.trim_start_matches('/'))
}
