//! # GPUI Navigation Guard
//!
//! Keeps users from silently losing unsaved edits when they navigate away.
//!
//! - **Guarded views** - Views report their URL and whether they are clean
//!   through [`RoutableView`]
//! - **Session guard** - [`NavigationGuard`] decides whether a location change
//!   may proceed and announces refusals to the view
//! - **Router controller** - [`RouterController`] reacts to location changes,
//!   renders through host templates, and sends the display back to a dirty
//!   view when the transport already moved
//! - **Deferred replay** - [`ReplayScheduler`] waits for every listener of the
//!   refused change to finish before navigating back
//! - **Exit warning** - A platform "confirm before leaving" toggle driven by
//!   the guard
//!
//! # Quick Start
//!
//! ```ignore
//! use gpui::*;
//! use gpui_navguard::*;
//! use std::rc::Rc;
//!
//! fn main() {
//!     Application::new().run(|cx| {
//!         let guard = NavigationGuard::new();
//!         let transport = MemoryTransport::new("/");
//!
//!         let controller = RouterController::builder(guard.clone(), transport.clone())
//!             .resolver(resolver_fn(|path| match path {
//!                 "/" => Some(RouteData::new("Index")),
//!                 "/Record/Editor" => Some(RouteData::new("RecordEditor")),
//!                 _ => None,
//!             }))
//!             .found(|route, _cx| println!("render {}", route.handler))
//!             .not_found(|path, _cx| println!("nothing at {}", path))
//!             .build()
//!             .expect("router configuration");
//!
//!         controller.start(cx).expect("router start");
//!     });
//! }
//! ```
//!
//! # Guarding a view
//!
//! ```ignore
//! let editor = Rc::new(TrackedView::new("/Record/Editor?id=1"));
//! guard.set_active_view(&editor);
//! let _alert = guard.on_navigation_cancelled(|cx| show_unsaved_alert(cx));
//!
//! editor.mark_dirty();
//! transport.navigate_to("/", false, cx);
//! // The editor stays; after its re-navigation delay the transport returns
//! // to /Record/Editor?id=1 and the alert fires.
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)

#![doc(html_root_url = "https://docs.rs/gpui-navguard/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// URL helpers
pub mod url;

// Guard core
pub mod events;
pub mod guard;
pub mod view;

// Routing
pub mod controller;
pub mod params;
pub mod resolver;
pub mod scheduler;
pub mod transport;

// Error handling
pub mod error;

// Re-export main types for convenient access
pub use controller::{ControllerPhase, RouterController, RouterControllerBuilder};
pub use error::{ConfigurationError, NavigationOutcome};
pub use events::{GuardEvent, Subscribers, Subscription};
pub use guard::{ExitWarningHook, NavigationDecision, NavigationGuard};
pub use params::{QueryParams, RouteParams};
pub use resolver::{resolver_fn, FnResolver, RouteData, RouteResolver};
pub use scheduler::ReplayScheduler;
pub use transport::{LocationChanged, MemoryTransport, NavigationRecord, NavigationTransport};
pub use view::{RoutableView, TrackedView, DEFAULT_RE_NAVIGATION_DELAY};
