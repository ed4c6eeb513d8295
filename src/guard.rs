//! Session-scoped unsaved-changes guard.
//!
//! [`NavigationGuard`] remembers which [`RoutableView`] is live, where the user
//! came from, and whether a navigation is currently being refused. The
//! [`RouterController`](crate::RouterController) asks it for a decision on
//! every location change; views subscribe to its events to show their
//! "unsaved changes" UI.
//!
//! Create one guard per user session and hand clones of it to the controller
//! and to every view. Clones share state.
//!
//! # Decision table
//!
//! | Active view | Transport shows | Decision | Event |
//! |-------------|-----------------|----------|-------|
//! | none / clean | anything | allowed | `SameRouteNavigation` if only the query changed |
//! | dirty | the view's own URL | cancelled in place | `NavigationCancelled` |
//! | dirty | some other URL | replay back to the view | none |
//!
//! # Example
//!
//! ```ignore
//! let guard = NavigationGuard::new();
//! let editor = Rc::new(TrackedView::new("/Record/Editor?id=1"));
//! guard.set_active_view(&editor);
//!
//! let _alert = guard.on_navigation_cancelled(|cx| show_unsaved_alert(cx));
//! editor.mark_dirty();
//!
//! let decision = guard.evaluate("/Index", "/Index", cx);
//! assert!(decision.re_navigate);
//! ```

use crate::events::{GuardEvent, Subscribers, Subscription};
use crate::url::{strip_query_and_fragment, urls_equal};
use crate::view::RoutableView;
use crate::{debug_log, trace_log};
use gpui::App;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// ============================================================================
// NavigationDecision
// ============================================================================

/// What the guard decided about one location change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationDecision {
    /// The controller may resolve and render the new location.
    pub allowed: bool,
    /// The transport already shows the refused URL and must be sent back to
    /// the active view's URL.
    pub re_navigate: bool,
}

impl NavigationDecision {
    /// Navigation may proceed.
    pub const ALLOWED: Self = Self {
        allowed: true,
        re_navigate: false,
    };

    /// Navigation refused; the display already shows the vetoing view.
    pub const CANCELLED_IN_PLACE: Self = Self {
        allowed: false,
        re_navigate: false,
    };

    /// Navigation refused; the transport must be replayed back.
    pub const RE_NAVIGATE: Self = Self {
        allowed: false,
        re_navigate: true,
    };
}

// ============================================================================
// ExitWarningHook
// ============================================================================

/// Platform "confirm before leaving" toggle, e.g. a window-close prompt.
///
/// Fire-and-forget; the guard only calls it when the requested state differs
/// from the last one it set.
pub trait ExitWarningHook: 'static {
    /// Turn the warning on or off.
    fn set_exit_warning(&self, show: bool, cx: &mut App);
}

impl<F> ExitWarningHook for F
where
    F: Fn(bool, &mut App) + 'static,
{
    fn set_exit_warning(&self, show: bool, cx: &mut App) {
        self(show, cx);
    }
}

// ============================================================================
// NavigationGuard
// ============================================================================

#[derive(Default)]
struct GuardState {
    active_view: Option<Weak<dyn RoutableView>>,
    last_route_url: Option<String>,
    return_route_url: Option<String>,
    navigation_cancelled_url: Option<String>,
}

struct GuardInner {
    state: RefCell<GuardState>,
    navigation_cancelled: Subscribers<GuardEvent>,
    same_route_navigation: Subscribers<GuardEvent>,
    exit_warning_hook: RefCell<Option<Rc<dyn ExitWarningHook>>>,
    exit_warning_shown: Cell<bool>,
}

/// Unsaved-changes guard for one user session.
///
/// Cloning yields another handle to the same session state.
#[derive(Clone)]
pub struct NavigationGuard {
    inner: Rc<GuardInner>,
}

impl NavigationGuard {
    /// Create a guard with no active view and no navigation history.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(GuardInner {
                state: RefCell::new(GuardState::default()),
                navigation_cancelled: Subscribers::new(),
                same_route_navigation: Subscribers::new(),
                exit_warning_hook: RefCell::new(None),
                exit_warning_shown: Cell::new(false),
            }),
        }
    }

    /// Attach the platform exit-warning toggle.
    pub fn with_exit_warning(self, hook: impl ExitWarningHook) -> Self {
        *self.inner.exit_warning_hook.borrow_mut() = Some(Rc::new(hook));
        self
    }

    // ========================================================================
    // Active view
    // ========================================================================

    /// Make `view` the live view for dirty checks. The guard keeps only a
    /// weak reference.
    pub fn set_active_view<V: RoutableView>(&self, view: &Rc<V>) {
        let weak: Weak<dyn RoutableView> = Rc::<V>::downgrade(view);
        self.inner.state.borrow_mut().active_view = Some(weak);
    }

    /// Forget the active view.
    pub fn clear_active_view(&self) {
        self.inner.state.borrow_mut().active_view = None;
    }

    /// The active view, if one is set and still alive.
    pub fn active_view(&self) -> Option<Rc<dyn RoutableView>> {
        self.inner
            .state
            .borrow()
            .active_view
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Whether a live view is registered.
    pub fn has_active_view(&self) -> bool {
        self.active_view().is_some()
    }

    /// `true` when there is no live view or it has nothing to lose.
    pub fn is_good_to_navigate(&self) -> bool {
        self.active_view().is_none_or(|view| view.is_clean())
    }

    /// The active view's own URL, or `""` without one.
    pub fn current_route_url(&self) -> String {
        self.active_view()
            .map(|view| view.route_url())
            .unwrap_or_default()
    }

    // ========================================================================
    // Route history
    // ========================================================================

    /// Bare path of the most recent navigation.
    pub fn last_route_url(&self) -> Option<String> {
        self.inner.state.borrow().last_route_url.clone()
    }

    /// Seed the bare path of the current location. The query string and
    /// fragment are dropped.
    pub fn set_last_route_url(&self, url: &str) {
        self.inner.state.borrow_mut().last_route_url =
            Some(strip_query_and_fragment(url).to_string());
    }

    /// The last *different* route navigated from. Useful for "go back" actions.
    pub fn return_route_url(&self) -> Option<String> {
        self.inner.state.borrow().return_route_url.clone()
    }

    /// URL of a refused navigation waiting for its replay to land.
    pub fn navigation_cancelled_url(&self) -> Option<String> {
        self.inner.state.borrow().navigation_cancelled_url.clone()
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Decide whether the transport may move to `raw_url`.
    ///
    /// `current_location` is what the transport reports as its current URL.
    /// It equals `raw_url` for a fresh navigation and may differ while a
    /// replay is in flight.
    ///
    /// Fires at most one event. Never fails: every input is an opaque string.
    pub fn evaluate(
        &self,
        raw_url: &str,
        current_location: &str,
        cx: &mut App,
    ) -> NavigationDecision {
        let route_path = strip_query_and_fragment(raw_url);

        let same_route = self
            .inner
            .state
            .borrow()
            .last_route_url
            .as_deref()
            .is_some_and(|last| urls_equal(last, route_path));

        if same_route {
            trace_log!("Same-route navigation to '{}'", raw_url);
            self.trigger_same_route_navigation(cx);
        }

        {
            let mut state = self.inner.state.borrow_mut();
            if !same_route {
                state.return_route_url = state.last_route_url.take();
            }
            state.last_route_url = Some(route_path.to_string());
        }

        if self.is_good_to_navigate() {
            let mut state = self.inner.state.borrow_mut();
            state.active_view = None;
            state.navigation_cancelled_url = None;
            trace_log!("Navigation to '{}' allowed", raw_url);
            return NavigationDecision::ALLOWED;
        }

        let owner_url = self.current_route_url();
        if urls_equal(&owner_url, current_location) {
            debug_log!(
                "Navigation to '{}' cancelled in place by '{}'",
                raw_url,
                owner_url
            );
            self.trigger_navigation_cancelled(cx);
            NavigationDecision::CANCELLED_IN_PLACE
        } else {
            debug_log!(
                "Navigation to '{}' refused; transport must return to '{}'",
                raw_url,
                owner_url
            );
            self.inner.state.borrow_mut().navigation_cancelled_url = Some(raw_url.to_string());
            NavigationDecision::RE_NAVIGATE
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Run `handler` whenever a navigation away from the dirty view is
    /// refused in place.
    pub fn on_navigation_cancelled(&self, handler: impl Fn(&mut App) + 'static) -> Subscription {
        self.inner
            .navigation_cancelled
            .insert(move |_, cx| handler(cx))
    }

    /// Run `handler` whenever only the query string or fragment changed.
    pub fn on_same_route_navigation(&self, handler: impl Fn(&mut App) + 'static) -> Subscription {
        self.inner
            .same_route_navigation
            .insert(move |_, cx| handler(cx))
    }

    /// Notify `NavigationCancelled` subscribers now.
    pub fn trigger_navigation_cancelled(&self, cx: &mut App) {
        let delivered = self
            .inner
            .navigation_cancelled
            .notify(&GuardEvent::NavigationCancelled, cx);
        trace_log!("NavigationCancelled delivered to {} handler(s)", delivered);
    }

    /// Notify `SameRouteNavigation` subscribers now.
    pub fn trigger_same_route_navigation(&self, cx: &mut App) {
        let delivered = self
            .inner
            .same_route_navigation
            .notify(&GuardEvent::SameRouteNavigation, cx);
        trace_log!("SameRouteNavigation delivered to {} handler(s)", delivered);
    }

    // ========================================================================
    // Exit warning
    // ========================================================================

    /// Turn the platform exit warning on or off. Repeating the current state
    /// does nothing.
    pub fn set_exit_warning(&self, show: bool, cx: &mut App) {
        if self.inner.exit_warning_shown.get() == show {
            return;
        }
        self.inner.exit_warning_shown.set(show);

        let hook = self.inner.exit_warning_hook.borrow().clone();
        if let Some(hook) = hook {
            hook.set_exit_warning(show, cx);
        }
    }

    /// Last state passed to [`set_exit_warning`](Self::set_exit_warning).
    pub fn exit_warning_shown(&self) -> bool {
        self.inner.exit_warning_shown.get()
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("NavigationGuard")
            .field(
                "active_view",
                &state.active_view.as_ref().map(|w| w.strong_count() > 0),
            )
            .field("last_route_url", &state.last_route_url)
            .field("return_route_url", &state.return_route_url)
            .field("navigation_cancelled_url", &state.navigation_cancelled_url)
            .field("exit_warning_shown", &self.inner.exit_warning_shown.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
