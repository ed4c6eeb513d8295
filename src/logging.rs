//! Logging facade for the guard and controller.
//!
//! Every message is emitted under the `navguard` target so hosts can turn the
//! guard's chatter up or down independently of their own modules, e.g.
//! `RUST_LOG=navguard=debug`.
//!
//! The backend is picked by feature flag. The two features are **mutually
//! exclusive**; enable at most one.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! What gets logged where:
//!
//! | Level | Events |
//! |-------|--------|
//! | `trace` | every guard evaluation and event fan-out |
//! | `debug` | renders, not-found fallbacks, external reloads, replays |
//! | `info`  | controller start/stop |
//! | `warn`  | vetoed navigations, dropped replays, lost app context |
//! | `error` | configuration failures |
//!
//! ```ignore
//! use gpui_navguard::{debug_log, warn_log};
//!
//! debug_log!("Rendering '{}' for path '{}'", handler, path);
//! warn_log!("Navigation to '{}' vetoed by unsaved view '{}'", target, owner);
//! ```

/// Log target shared by all of the crate's messages.
pub const LOG_TARGET: &str = "navguard";

/// Emit a **trace**-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **debug**-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **info**-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit a **warn**-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}

/// Emit an **error**-level message under [`LOG_TARGET`].
///
/// Only configuration failures are logged at this level; vetoes and route
/// misses are expected outcomes.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: $crate::logging::LOG_TARGET, $($arg)*);
    };
}
