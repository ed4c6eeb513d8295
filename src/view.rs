//! The capability every guarded view exposes.
//!
//! A view that can hold unsaved edits implements [`RoutableView`] and
//! registers itself with the session's [`NavigationGuard`](crate::NavigationGuard)
//! when it becomes active:
//!
//! ```
//! use gpui_navguard::{RoutableView, TrackedView};
//! use std::rc::Rc;
//!
//! let editor = Rc::new(TrackedView::new("/Record/Editor?id=1"));
//! assert!(editor.is_clean());
//!
//! editor.mark_dirty();
//! assert!(!editor.is_clean());
//! assert_eq!(editor.route_url(), "/Record/Editor?id=1");
//! ```
//!
//! The guard only ever holds a weak reference to the view, so dropping the
//! view's last `Rc` is enough to take it out of the dirty check.

use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Delay before a vetoed navigation is replayed back to the active view.
pub const DEFAULT_RE_NAVIGATION_DELAY: Duration = Duration::from_millis(50);

/// Queried by the guard to decide whether the user may leave a view.
///
/// All methods are called synchronously on the foreground thread and must not
/// block or change the view's state.
pub trait RoutableView: 'static {
    /// The URL this view recorded for itself when it was activated, relative
    /// to the transport's base URI (e.g. `/Record/Editor?id=1`).
    fn route_url(&self) -> String;

    /// `true` when the view has no unsaved edits.
    fn is_clean(&self) -> bool;

    /// How long to wait before replaying the navigation back to this view
    /// after a veto. Only queried when a replay is scheduled.
    fn re_navigation_delay(&self) -> Duration {
        DEFAULT_RE_NAVIGATION_DELAY
    }
}

/// Ready-made [`RoutableView`] state for editor-like views.
///
/// Holds the view's URL, its clean/dirty flag, an optional replay delay, and
/// whether the user tried to leave while dirty.
#[derive(Debug)]
pub struct TrackedView {
    route_url: RefCell<String>,
    clean: Cell<bool>,
    re_navigation_delay: Cell<Duration>,
    exit_attempted: Cell<bool>,
}

impl TrackedView {
    /// Create a clean view owning `route_url`.
    pub fn new(route_url: impl Into<String>) -> Self {
        Self {
            route_url: RefCell::new(route_url.into()),
            clean: Cell::new(true),
            re_navigation_delay: Cell::new(DEFAULT_RE_NAVIGATION_DELAY),
            exit_attempted: Cell::new(false),
        }
    }

    /// Record the URL this view owns.
    pub fn set_route_url(&self, url: impl Into<String>) {
        *self.route_url.borrow_mut() = url.into();
    }

    /// Flag unsaved edits.
    pub fn mark_dirty(&self) {
        self.clean.set(false);
        self.exit_attempted.set(false);
    }

    /// Flag the view as saved, or as abandoned on a confirmed exit.
    pub fn mark_clean(&self) {
        self.clean.set(true);
        self.exit_attempted.set(false);
    }

    /// Override the replay delay for this view.
    pub fn set_re_navigation_delay(&self, delay: Duration) {
        self.re_navigation_delay.set(delay);
    }

    /// Remember that the user tried to leave while dirty.
    pub fn note_exit_attempt(&self) {
        self.exit_attempted.set(true);
    }

    /// Whether the user tried to leave since the last edit or save.
    pub fn exit_attempted(&self) -> bool {
        self.exit_attempted.get()
    }

    /// Dismiss a pending exit attempt (the user chose to keep editing).
    pub fn clear_exit_attempt(&self) {
        self.exit_attempted.set(false);
    }
}

impl RoutableView for TrackedView {
    fn route_url(&self) -> String {
        self.route_url.borrow().clone()
    }

    fn is_clean(&self) -> bool {
        self.clean.get()
    }

    fn re_navigation_delay(&self) -> Duration {
        self.re_navigation_delay.get()
    }
}
