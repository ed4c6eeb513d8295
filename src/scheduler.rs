//! Deferred replay of a refused navigation.
//!
//! When a dirty view refuses a navigation that the transport has already
//! performed, the display must be sent back to the view. Doing so from inside
//! the location-changed handler would re-enter the transport, so the replay
//! runs on the foreground executor after a short delay instead.
//!
//! At most one replay is in flight per scheduler; further requests are
//! dropped until it lands.

use crate::transport::NavigationTransport;
use crate::{debug_log, warn_log};
use gpui::App;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Sends the transport back to a view URL after a delay.
#[derive(Clone)]
pub struct ReplayScheduler {
    transport: Rc<dyn NavigationTransport>,
    in_flight: Rc<Cell<bool>>,
}

impl ReplayScheduler {
    /// Create a scheduler driving `transport`.
    pub fn new(transport: Rc<dyn NavigationTransport>) -> Self {
        Self {
            transport,
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    /// Navigate the transport to `target` once `delay` has elapsed.
    ///
    /// `target` is taken as given; it is not re-read when the timer fires.
    /// Returns `false` (and schedules nothing) while another replay is
    /// pending.
    pub fn schedule_replay(&self, target: String, delay: Duration, cx: &mut App) -> bool {
        if self.in_flight.replace(true) {
            warn_log!(
                "Replay to '{}' dropped: another replay is still pending",
                target
            );
            return false;
        }

        debug_log!("Replaying navigation to '{}' in {:?}", target, delay);

        let transport = self.transport.clone();
        let in_flight = self.in_flight.clone();
        cx.spawn(async move |cx| {
            cx.background_executor().timer(delay).await;
            in_flight.set(false);
            if let Err(err) = cx.update(|cx| transport.navigate_to(&target, false, cx)) {
                warn_log!("Replay to '{}' abandoned: {}", target, err);
            }
        })
        .detach();

        true
    }

    /// Whether a replay is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.in_flight.get()
    }
}

impl fmt::Debug for ReplayScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayScheduler")
            .field("pending", &self.in_flight.get())
            .finish_non_exhaustive()
    }
}
