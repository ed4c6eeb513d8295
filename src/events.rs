//! Synchronous observer lists.
//!
//! The guard announces [`GuardEvent`]s and the transport announces location
//! changes through [`Subscribers`], a plain callback list that runs on the
//! GPUI foreground thread:
//!
//! - handlers run synchronously, in registration order;
//! - a handler may subscribe or unsubscribe (itself or others) while the list
//!   is being notified. The notification works on a snapshot, and handlers
//!   removed mid-dispatch are skipped;
//! - dropping a [`Subscription`] unsubscribes; unsubscribing twice is a no-op.

use gpui::App;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Events the [`NavigationGuard`](crate::NavigationGuard) fans out to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    /// A navigation away from the dirty active view was refused and the
    /// display still shows that view. Views typically raise an
    /// "unsaved changes" alert in response.
    NavigationCancelled,

    /// A navigation kept the same bare path and only changed the query string
    /// or fragment, e.g. `/Record/Editor?id=1` → `/Record/Editor?id=2`.
    SameRouteNavigation,
}

type Handler<E> = Rc<dyn Fn(&E, &mut App)>;

struct HandlerList<E> {
    next_id: usize,
    entries: Vec<(usize, Handler<E>)>,
}

/// An ordered list of event handlers.
pub struct Subscribers<E: 'static> {
    list: Rc<RefCell<HandlerList<E>>>,
}

impl<E: 'static> Subscribers<E> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            list: Rc::new(RefCell::new(HandlerList {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `handler`; it stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn insert(&self, handler: impl Fn(&E, &mut App) + 'static) -> Subscription {
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Rc::new(handler)));
            id
        };

        let list: Weak<RefCell<HandlerList<E>>> = Rc::downgrade(&self.list);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Call every registered handler with `event`. Returns how many ran.
    pub fn notify(&self, event: &E, cx: &mut App) -> usize {
        let snapshot: Vec<(usize, Handler<E>)> = self.list.borrow().entries.clone();
        let mut delivered = 0;

        for (id, handler) in snapshot {
            if !self.is_registered(id) {
                continue;
            }
            handler(event, cx);
            delivered += 1;
        }

        delivered
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.list.borrow().entries.len()
    }

    /// Return `true` when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_registered(&self, id: usize) -> bool {
        self.list
            .borrow()
            .entries
            .iter()
            .any(|(entry, _)| *entry == id)
    }
}

impl<E: 'static> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}

/// Keeps a handler registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub(crate) fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Cell::new(Some(Box::new(unsubscribe))),
        }
    }

    /// Remove the handler now. Safe to call repeatedly and from inside the
    /// handler itself.
    pub fn unsubscribe(&self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Keep the handler registered for as long as its list lives.
    pub fn detach(self) {
        drop(self.unsubscribe.take());
    }

    /// `false` once [`unsubscribe`](Self::unsubscribe) has run.
    pub fn is_active(&self) -> bool {
        let callback = self.unsubscribe.take();
        let active = callback.is_some();
        self.unsubscribe.set(callback);
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
