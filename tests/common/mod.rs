//! Test utilities for guard and controller tests
//!
//! Provides a recording host (templates that log what they rendered), a small
//! route table, and helpers for dirty editors.

#![allow(dead_code)]

use gpui::TestAppContext;
use gpui_navguard::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// What the host's templates were asked to show, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Found(String),
    NotFound(String),
}

/// A started controller plus everything a test wants to poke at.
pub struct Harness {
    pub guard: NavigationGuard,
    pub transport: MemoryTransport,
    pub controller: RouterController,
    pub rendered: Rc<RefCell<Vec<Rendered>>>,
}

impl Harness {
    /// Last thing the templates rendered.
    pub fn last_rendered(&self) -> Option<Rendered> {
        self.rendered.borrow().last().cloned()
    }

    /// Number of template invocations so far.
    pub fn render_count(&self) -> usize {
        self.rendered.borrow().len()
    }
}

/// Route table used across tests: `/`, `/A`, `/B`, `/Edit`, `/Other`,
/// `/Record/Editor` and `/users/:id`.
pub fn test_resolver() -> FnResolver<impl Fn(&str) -> Option<RouteData> + 'static> {
    resolver_fn(|path: &str| {
        let handler = match path.to_ascii_lowercase().as_str() {
            "/" => "Index",
            "/a" => "PageA",
            "/b" => "PageB",
            "/edit" => "Editor",
            "/other" => "Other",
            "/record/editor" => "RecordEditor",
            lower => {
                let id = lower.strip_prefix("/users/")?;
                let mut params = RouteParams::new();
                params.insert("id", id);
                return Some(RouteData::new("UserDetail").with_params(params));
            }
        };
        Some(RouteData::new(handler))
    })
}

/// Build a controller over a fresh transport showing `initial`, without
/// starting it.
pub fn build_harness(initial: &str) -> Harness {
    let guard = NavigationGuard::new();
    let transport = MemoryTransport::new(initial);
    let rendered = Rc::new(RefCell::new(Vec::new()));

    let controller = {
        let found_log = rendered.clone();
        let missing_log = rendered.clone();
        RouterController::builder(guard.clone(), transport.clone())
            .resolver(test_resolver())
            .found(move |route, _cx| {
                found_log
                    .borrow_mut()
                    .push(Rendered::Found(route.handler.clone()));
            })
            .not_found(move |path, _cx| {
                missing_log
                    .borrow_mut()
                    .push(Rendered::NotFound(path.to_string()));
            })
            .build()
            .expect("test controller is fully configured")
    };

    Harness {
        guard,
        transport,
        controller,
        rendered,
    }
}

/// Build and start a controller over a transport showing `initial`.
pub fn start_harness(initial: &str, cx: &mut TestAppContext) -> Harness {
    let harness = build_harness(initial);
    cx.update(|cx| harness.controller.start(cx))
        .expect("controller starts");
    harness
}

/// Register a dirty editor owning `url` as the active view.
pub fn dirty_editor(guard: &NavigationGuard, url: &str) -> Rc<TrackedView> {
    let editor = Rc::new(TrackedView::new(url));
    editor.mark_dirty();
    guard.set_active_view(&editor);
    editor
}

/// Advance the fake clock by `ms` and run everything that became ready.
pub fn advance(cx: &mut TestAppContext, ms: u64) {
    cx.executor().advance_clock(Duration::from_millis(ms));
    cx.run_until_parked();
}

/// Record every location the transport announces, as seen by an independent
/// listener.
pub fn record_locations(
    transport: &MemoryTransport,
) -> (Rc<RefCell<Vec<String>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let subscription = {
        let seen = seen.clone();
        transport.subscribe(Box::new(move |event, _cx| {
            seen.borrow_mut().push(event.location.clone());
        }))
    };
    (seen, subscription)
}
