//! Errors and outcomes of the navigation guard.
//!
//! Only misconfiguration is an error. Everything that happens in normal
//! operation (a refused navigation, an unknown route, a replay) is reported
//! as a [`NavigationOutcome`]:
//!
//! - [`ConfigurationError`]: the controller was built without a required
//!   collaborator, or used before/after its lifecycle allows. Fatal: the host
//!   should refuse to start.
//! - [`NavigationOutcome`]: what the controller did with one location change.
//!
//! # Examples
//!
//! ```
//! use gpui_navguard::{ConfigurationError, NavigationOutcome};
//!
//! let outcome = NavigationOutcome::NotFound { path: "/missing".into() };
//! assert!(outcome.is_not_found());
//!
//! let error = ConfigurationError::MissingFoundTemplate;
//! assert_eq!(
//!     error.to_string(),
//!     "router controller requires a Found template"
//! );
//! ```

use std::fmt;

// ============================================================================
// ConfigurationError
// ============================================================================

/// Fatal setup errors of the [`RouterController`](crate::RouterController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No route resolver was supplied.
    MissingResolver,

    /// No template for resolved routes was supplied.
    MissingFoundTemplate,

    /// No template for unresolved routes was supplied.
    MissingNotFoundTemplate,

    /// `start` was called on a controller that is already running.
    AlreadyStarted,

    /// A location change reached a controller that has not been started.
    NotInitialized {
        /// Location carried by the rejected notification.
        location: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingResolver => {
                write!(f, "router controller requires a route resolver")
            }
            ConfigurationError::MissingFoundTemplate => {
                write!(f, "router controller requires a Found template")
            }
            ConfigurationError::MissingNotFoundTemplate => {
                write!(f, "router controller requires a NotFound template")
            }
            ConfigurationError::AlreadyStarted => {
                write!(f, "router controller is already started")
            }
            ConfigurationError::NotInitialized { location } => {
                write!(
                    f,
                    "location change to '{}' received before the router controller was started",
                    location
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

// ============================================================================
// NavigationOutcome
// ============================================================================

/// What the controller did in response to one location change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The path resolved and the Found template rendered it.
    Rendered {
        /// Bare, base-relative path that was resolved.
        path: String,
        /// Handler the resolver picked.
        handler: String,
    },

    /// The path did not resolve and the NotFound template was rendered.
    NotFound {
        /// Bare, base-relative path that failed to resolve.
        path: String,
    },

    /// An intercepted link did not resolve; the transport was asked for a
    /// full reload because the target may not belong to this application.
    ExternalReload {
        /// Absolute URL that was reloaded.
        url: String,
    },

    /// The dirty view refused the navigation and is still displayed.
    CancelledInPlace {
        /// The URL the user tried to reach.
        attempted: String,
    },

    /// The dirty view refused the navigation after the transport had already
    /// moved; a replay back to the view is scheduled.
    ReNavigating {
        /// The URL the user tried to reach.
        attempted: String,
        /// The view URL the transport will be sent back to.
        target: String,
    },
}

impl NavigationOutcome {
    /// A view (found or not-found) was rendered.
    pub fn is_rendered(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::Rendered { .. } | NavigationOutcome::NotFound { .. }
        )
    }

    /// The not-found fallback was rendered.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationOutcome::NotFound { .. })
    }

    /// The dirty view refused the navigation, with or without a replay.
    pub fn is_vetoed(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::CancelledInPlace { .. } | NavigationOutcome::ReNavigating { .. }
        )
    }

    /// Replay target, if a replay was scheduled.
    pub fn replay_target(&self) -> Option<&str> {
        match self {
            NavigationOutcome::ReNavigating { target, .. } => Some(target),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
