//! Router controller: reacts to location changes.
//!
//! The controller listens to a [`NavigationTransport`], asks the
//! [`NavigationGuard`] about every location change and then renders through
//! the host's templates, leaves the dirty view in place, or schedules a
//! replay back to it.
//!
//! ```text
//!            location changed
//!                   │
//!                   ▼
//!   Idle ──────▶ Evaluating ──┬──▶ Rendering         (allowed / first render)
//!                             ├──▶ CancelledInPlace  (vetoed, display unchanged)
//!                             └──▶ ReNavigating      (vetoed, replay scheduled)
//!                                        │
//!                                        └── timer ──▶ transport.navigate_to(view url)
//!                                                       └──▶ Evaluating (new cycle)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let guard = NavigationGuard::new();
//! let transport = MemoryTransport::new("/");
//!
//! let controller = RouterController::builder(guard.clone(), transport.clone())
//!     .resolver(resolver_fn(|path| (path == "/").then(|| RouteData::new("Index"))))
//!     .found(|route, cx| show_page(&route.handler, cx))
//!     .not_found(|path, cx| show_missing(path, cx))
//!     .build()?;
//!
//! controller.start(cx)?;
//! ```

use crate::error::{ConfigurationError, NavigationOutcome};
use crate::events::Subscription;
use crate::guard::NavigationGuard;
use crate::resolver::{RouteData, RouteResolver};
use crate::scheduler::ReplayScheduler;
use crate::transport::{LocationChanged, NavigationTransport};
use crate::url::{strip_query_and_fragment, to_base_relative_path};
use crate::view::DEFAULT_RE_NAVIGATION_DELAY;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use gpui::App;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

type FoundTemplate = Rc<dyn Fn(&RouteData, &mut App)>;
type NotFoundTemplate = Rc<dyn Fn(&str, &mut App)>;

// ============================================================================
// ControllerPhase
// ============================================================================

/// Where the controller is in handling a location change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPhase {
    /// No location change handled yet.
    #[default]
    Idle,
    /// Guard evaluation and route resolution in progress.
    Evaluating,
    /// The last change was accepted and a template rendered.
    Rendering,
    /// The last change was refused and the display still shows the vetoing
    /// view.
    CancelledInPlace,
    /// The last change was refused and a replay back to the view is pending.
    ReNavigating,
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`RouterController`]. Created by [`RouterController::builder`].
pub struct RouterControllerBuilder {
    guard: NavigationGuard,
    transport: Rc<dyn NavigationTransport>,
    resolver: Option<Rc<dyn RouteResolver>>,
    found: Option<FoundTemplate>,
    not_found: Option<NotFoundTemplate>,
    default_re_navigation_delay: Duration,
}

impl RouterControllerBuilder {
    /// Route table lookup.
    pub fn resolver(mut self, resolver: impl RouteResolver) -> Self {
        self.resolver = Some(Rc::new(resolver));
        self
    }

    /// Template rendering a resolved route.
    pub fn found(mut self, template: impl Fn(&RouteData, &mut App) + 'static) -> Self {
        self.found = Some(Rc::new(template));
        self
    }

    /// Template rendering a path nothing resolved.
    pub fn not_found(mut self, template: impl Fn(&str, &mut App) + 'static) -> Self {
        self.not_found = Some(Rc::new(template));
        self
    }

    /// Replay delay used when no active view is left to ask.
    pub fn default_re_navigation_delay(mut self, delay: Duration) -> Self {
        self.default_re_navigation_delay = delay;
        self
    }

    /// Validate the configuration and create the controller.
    pub fn build(self) -> Result<RouterController, ConfigurationError> {
        let resolver = self.resolver.ok_or(ConfigurationError::MissingResolver);
        let found = self.found.ok_or(ConfigurationError::MissingFoundTemplate);
        let not_found = self
            .not_found
            .ok_or(ConfigurationError::MissingNotFoundTemplate);

        let (resolver, found, not_found) = match (resolver, found, not_found) {
            (Ok(resolver), Ok(found), Ok(not_found)) => (resolver, found, not_found),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                error_log!("Router controller misconfigured: {}", err);
                return Err(err);
            }
        };

        let scheduler = ReplayScheduler::new(self.transport.clone());
        Ok(RouterController {
            inner: Rc::new(ControllerInner {
                guard: self.guard,
                transport: self.transport,
                resolver,
                found,
                not_found,
                scheduler,
                default_re_navigation_delay: self.default_re_navigation_delay,
                state: RefCell::new(ControllerState::default()),
                phase: Cell::new(ControllerPhase::Idle),
            }),
        })
    }
}

// ============================================================================
// RouterController
// ============================================================================

#[derive(Default)]
struct ControllerState {
    subscription: Option<Subscription>,
    base_uri: String,
    location: String,
    first_render_done: bool,
    interception_enabled: bool,
}

struct ControllerInner {
    guard: NavigationGuard,
    transport: Rc<dyn NavigationTransport>,
    resolver: Rc<dyn RouteResolver>,
    found: FoundTemplate,
    not_found: NotFoundTemplate,
    scheduler: ReplayScheduler,
    default_re_navigation_delay: Duration,
    state: RefCell<ControllerState>,
    phase: Cell<ControllerPhase>,
}

/// Drives rendering from transport location changes, consulting the guard
/// first.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct RouterController {
    inner: Rc<ControllerInner>,
}

impl RouterController {
    /// Start configuring a controller for `guard` and `transport`.
    pub fn builder(
        guard: NavigationGuard,
        transport: impl NavigationTransport,
    ) -> RouterControllerBuilder {
        RouterControllerBuilder {
            guard,
            transport: Rc::new(transport),
            resolver: None,
            found: None,
            not_found: None,
            default_re_navigation_delay: DEFAULT_RE_NAVIGATION_DELAY,
        }
    }

    /// Attach to the transport and render the current location.
    ///
    /// The initial render does not consult the guard.
    pub fn start(&self, cx: &mut App) -> Result<NavigationOutcome, ConfigurationError> {
        if self.is_started() {
            error_log!("Router controller started twice");
            return Err(ConfigurationError::AlreadyStarted);
        }

        let base_uri = self.inner.transport.base_uri();
        let location = self.inner.transport.uri();
        info_log!("Router controller starting at '{}' (base '{}')", location, base_uri);

        self.inner
            .guard
            .set_last_route_url(&to_base_relative_path(&base_uri, &location));

        let weak: Weak<ControllerInner> = Rc::downgrade(&self.inner);
        let subscription = self.inner.transport.subscribe(Box::new(move |event, cx| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = RouterController { inner };
            if let Err(err) = controller.handle_location_changed(event, cx) {
                error_log!("Location change not handled: {}", err);
            }
        }));

        {
            let mut state = self.inner.state.borrow_mut();
            state.subscription = Some(subscription);
            state.base_uri = base_uri;
            state.location = location.clone();
            state.first_render_done = false;
        }

        Ok(self.refresh(&location, false, cx))
    }

    /// Detach from the transport. Further location changes are ignored.
    pub fn stop(&self) {
        let subscription = self.inner.state.borrow_mut().subscription.take();
        if subscription.is_some() {
            info_log!("Router controller stopped");
        }
        drop(subscription);
    }

    /// Handle one location-changed notification.
    ///
    /// Transports call this through the subscription made in
    /// [`start`](Self::start). Hosts that own their own event plumbing may
    /// call it directly.
    pub fn handle_location_changed(
        &self,
        event: &LocationChanged,
        cx: &mut App,
    ) -> Result<NavigationOutcome, ConfigurationError> {
        if !self.is_started() {
            error_log!(
                "Location change to '{}' received before start",
                event.location
            );
            return Err(ConfigurationError::NotInitialized {
                location: event.location.clone(),
            });
        }

        self.inner.phase.set(ControllerPhase::Evaluating);
        let (base_uri, first_render_done) = {
            let mut state = self.inner.state.borrow_mut();
            state.location = event.location.clone();
            (state.base_uri.clone(), state.first_render_done)
        };
        trace_log!(
            "Location changed to '{}' (intercepted: {})",
            event.location,
            event.is_navigation_intercepted
        );

        // Step 1: Ask the guard
        let requested = to_base_relative_path(&base_uri, &event.location);
        let current = to_base_relative_path(&base_uri, &self.inner.transport.uri());
        let decision = self.inner.guard.evaluate(&requested, &current, cx);

        // Step 2: Render when allowed (or when nothing has been rendered yet)
        if !first_render_done || decision.allowed {
            return Ok(self.refresh(&event.location, event.is_navigation_intercepted, cx));
        }

        // Step 3: Vetoed. Either stay put or replay back to the view.
        if !decision.re_navigate {
            warn_log!(
                "Navigation to '{}' cancelled; unsaved changes on '{}'",
                requested,
                self.inner.guard.current_route_url()
            );
            self.inner.phase.set(ControllerPhase::CancelledInPlace);
            return Ok(NavigationOutcome::CancelledInPlace {
                attempted: requested,
            });
        }

        let target = self.inner.guard.current_route_url();
        let delay = self
            .inner
            .guard
            .active_view()
            .map_or(self.inner.default_re_navigation_delay, |view| {
                view.re_navigation_delay()
            });
        warn_log!(
            "Navigation to '{}' refused; returning to '{}'",
            requested,
            target
        );
        self.inner.phase.set(ControllerPhase::ReNavigating);
        self.inner.scheduler.schedule_replay(target.clone(), delay, cx);

        Ok(NavigationOutcome::ReNavigating {
            attempted: requested,
            target,
        })
    }

    /// Resolve `location` and render it, or hand it back to the transport as
    /// a full load.
    fn refresh(
        &self,
        location: &str,
        is_navigation_intercepted: bool,
        cx: &mut App,
    ) -> NavigationOutcome {
        self.inner.phase.set(ControllerPhase::Rendering);
        let base_uri = self.inner.state.borrow().base_uri.clone();
        let relative = to_base_relative_path(&base_uri, location);
        let path = strip_query_and_fragment(&relative).to_string();

        let outcome = match self.inner.resolver.resolve(&path) {
            Some(route) => {
                debug_log!("Navigating to component '{}'", route.handler);
                (self.inner.found)(&route, cx);
                NavigationOutcome::Rendered {
                    path,
                    handler: route.handler,
                }
            }
            None if !is_navigation_intercepted => {
                debug_log!("Displaying NotFound for '{}'", path);
                (self.inner.not_found)(&path, cx);
                NavigationOutcome::NotFound { path }
            }
            None => {
                debug_log!("Navigating to non-component URI '{}'", location);
                self.inner.transport.navigate_to(location, true, cx);
                NavigationOutcome::ExternalReload {
                    url: location.to_string(),
                }
            }
        };

        if outcome.is_rendered() {
            self.after_render(cx);
        }
        outcome
    }

    fn after_render(&self, cx: &mut App) {
        let enable_interception = {
            let mut state = self.inner.state.borrow_mut();
            state.first_render_done = true;
            !std::mem::replace(&mut state.interception_enabled, true)
        };
        if enable_interception {
            trace_log!("Enabling navigation interception");
            self.inner.transport.enable_navigation_interception(cx);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Whether the controller is attached to its transport.
    pub fn is_started(&self) -> bool {
        self.inner.state.borrow().subscription.is_some()
    }

    /// Phase reached by the most recent location change.
    pub fn phase(&self) -> ControllerPhase {
        self.inner.phase.get()
    }

    /// Location carried by the most recent notification.
    pub fn location(&self) -> String {
        self.inner.state.borrow().location.clone()
    }

    /// The guard this controller consults.
    pub fn guard(&self) -> &NavigationGuard {
        &self.inner.guard
    }

    /// Whether a replay is waiting for its timer.
    pub fn replay_pending(&self) -> bool {
        self.inner.scheduler.is_pending()
    }
}

impl fmt::Debug for RouterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("RouterController")
            .field("started", &state.subscription.is_some())
            .field("phase", &self.inner.phase.get())
            .field("location", &state.location)
            .field("first_render_done", &state.first_render_done)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
