//! Integration tests for the router controller
//!
//! Drives a started controller through a `MemoryTransport` and checks what
//! the host templates rendered, what the transport was asked to do, and in
//! which order independent listeners observed it.

mod common;

use common::*;
use gpui::{App, TestAppContext};
use gpui_navguard::*;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// Accepted navigation
// ============================================================================

#[gpui::test]
fn test_start_renders_current_location(cx: &mut TestAppContext) {
    let harness = build_harness("/users/42?tab=profile");
    let outcome = cx.update(|cx| harness.controller.start(cx)).unwrap();

    assert_eq!(
        outcome,
        NavigationOutcome::Rendered {
            path: "/users/42".to_string(),
            handler: "UserDetail".to_string(),
        }
    );
    assert_eq!(harness.guard.last_route_url().as_deref(), Some("/users/42"));
    assert!(harness.controller.is_started());
    assert_eq!(harness.controller.location(), "/users/42?tab=profile");
}

#[gpui::test]
fn test_accepted_navigation_end_to_end(cx: &mut TestAppContext) {
    let harness = start_harness("/A", cx);
    let page_a = Rc::new(TrackedView::new("/A"));
    harness.guard.set_active_view(&page_a);

    cx.update(|cx| harness.transport.navigate_to("/B", false, cx));

    assert!(!harness.guard.has_active_view());
    assert_eq!(harness.guard.last_route_url().as_deref(), Some("/B"));
    assert_eq!(harness.guard.return_route_url().as_deref(), Some("/A"));
    assert_eq!(harness.last_rendered(), Some(Rendered::Found("PageB".into())));
    assert_eq!(harness.controller.phase(), ControllerPhase::Rendering);
}

#[gpui::test]
fn test_at_most_one_active_view(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);

    let first = Rc::new(TrackedView::new("/A"));
    harness.guard.set_active_view(&first);
    cx.update(|cx| harness.transport.navigate_to("/B", false, cx));
    assert!(!harness.guard.has_active_view());

    let second = Rc::new(TrackedView::new("/B"));
    harness.guard.set_active_view(&second);
    assert_eq!(harness.guard.current_route_url(), "/B");

    cx.update(|cx| harness.transport.navigate_to("/Other", false, cx));
    assert!(!harness.guard.has_active_view());
}

#[gpui::test]
fn test_same_route_navigation_rerenders_and_notifies(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);
    let same_route_hits = Rc::new(Cell::new(0));
    let _sub = {
        let hits = same_route_hits.clone();
        harness
            .guard
            .on_same_route_navigation(move |_| hits.set(hits.get() + 1))
    };

    cx.update(|cx| {
        harness
            .transport
            .navigate_to("/Record/Editor?id=1", false, cx);
    });
    assert_eq!(same_route_hits.get(), 0);
    assert_eq!(harness.guard.return_route_url().as_deref(), Some("/"));

    cx.update(|cx| {
        harness
            .transport
            .navigate_to("/Record/Editor?id=2", false, cx);
    });
    assert_eq!(same_route_hits.get(), 1);
    assert_eq!(harness.guard.return_route_url().as_deref(), Some("/"));
    assert_eq!(
        harness.last_rendered(),
        Some(Rendered::Found("RecordEditor".into()))
    );

    let query = QueryParams::from_url(&harness.controller.location());
    assert_eq!(query.get_as::<u32>("id"), Some(2));
}

// ============================================================================
// Resolution miss
// ============================================================================

#[gpui::test]
fn test_direct_miss_renders_not_found(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);

    cx.update(|cx| harness.transport.navigate_to("/missing?x=1", false, cx));

    assert_eq!(
        harness.last_rendered(),
        Some(Rendered::NotFound("/missing".into()))
    );
    assert!(harness.transport.navigations().iter().all(|n| !n.force_load));
}

#[gpui::test]
fn test_intercepted_miss_forces_full_reload(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);
    let renders_before = harness.render_count();

    cx.update(|cx| harness.transport.click_link("/docs/manual.pdf", cx));

    assert_eq!(harness.render_count(), renders_before);
    assert_eq!(
        harness.transport.navigations().last(),
        Some(&NavigationRecord {
            url: "/docs/manual.pdf".to_string(),
            force_load: true,
        })
    );
}

#[gpui::test]
fn test_intercepted_miss_outcome(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);

    let outcome = cx
        .update(|cx| {
            harness.controller.handle_location_changed(
                &LocationChanged {
                    location: "/static/report.html".to_string(),
                    is_navigation_intercepted: true,
                },
                cx,
            )
        })
        .unwrap();

    assert_eq!(
        outcome,
        NavigationOutcome::ExternalReload {
            url: "/static/report.html".to_string(),
        }
    );
}

#[gpui::test]
fn test_intercepted_hit_renders(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);

    cx.update(|cx| harness.transport.click_link("/users/7", cx));

    assert_eq!(
        harness.last_rendered(),
        Some(Rendered::Found("UserDetail".into()))
    );
}

// ============================================================================
// Veto
// ============================================================================

#[gpui::test]
fn test_veto_then_replay_ordering(cx: &mut TestAppContext) {
    let harness = start_harness("/Edit", cx);
    let (seen, _listener) = record_locations(&harness.transport);
    let _editor = dirty_editor(&harness.guard, "/Edit");
    let cancelled = Rc::new(Cell::new(0));
    let _alert = {
        let cancelled = cancelled.clone();
        harness
            .guard
            .on_navigation_cancelled(move |_| cancelled.set(cancelled.get() + 1))
    };

    cx.update(|cx| harness.transport.navigate_to("/Other", false, cx));

    // The second listener saw the refused change, and nothing else yet.
    assert_eq!(*seen.borrow(), vec!["/Other".to_string()]);
    assert_eq!(harness.controller.phase(), ControllerPhase::ReNavigating);
    assert!(harness.controller.replay_pending());
    assert_eq!(harness.transport.navigation_count("/Edit"), 0);

    advance(cx, 50);

    assert_eq!(
        *seen.borrow(),
        vec!["/Other".to_string(), "/Edit".to_string()]
    );
    assert_eq!(harness.transport.navigation_count("/Edit"), 1);
    assert_eq!(harness.transport.uri(), "/Edit");
    assert_eq!(cancelled.get(), 1);
    assert_eq!(harness.controller.phase(), ControllerPhase::CancelledInPlace);
    assert_eq!(harness.render_count(), 1);
}

#[gpui::test]
fn test_replay_navigates_back_exactly_once(cx: &mut TestAppContext) {
    let harness = start_harness("/A", cx);
    let _editor = dirty_editor(&harness.guard, "/A");

    cx.update(|cx| harness.transport.navigate_to("/B", false, cx));
    assert_eq!(harness.guard.navigation_cancelled_url().as_deref(), Some("/B"));

    advance(cx, 49);
    assert_eq!(harness.transport.navigation_count("/A"), 0);

    advance(cx, 1);
    assert_eq!(harness.transport.navigation_count("/A"), 1);

    advance(cx, 500);
    assert_eq!(harness.transport.navigation_count("/A"), 1);
    assert!(!harness.controller.replay_pending());
    assert!(harness.guard.has_active_view());
}

#[gpui::test]
fn test_replay_honors_view_delay(cx: &mut TestAppContext) {
    let harness = start_harness("/Edit", cx);
    let editor = dirty_editor(&harness.guard, "/Edit");
    editor.set_re_navigation_delay(Duration::from_millis(200));

    let outcome = cx
        .update(|cx| {
            harness.transport.navigate_to("/Other", false, cx);
            harness.controller.handle_location_changed(
                &LocationChanged {
                    location: "/Other".to_string(),
                    is_navigation_intercepted: false,
                },
                cx,
            )
        })
        .unwrap();
    assert_eq!(outcome.replay_target(), Some("/Edit"));

    advance(cx, 50);
    assert_eq!(harness.transport.navigation_count("/Edit"), 0);

    advance(cx, 150);
    assert_eq!(harness.transport.navigation_count("/Edit"), 1);
}

#[gpui::test]
fn test_veto_in_place_keeps_display(cx: &mut TestAppContext) {
    let harness = start_harness("/Edit", cx);
    let _editor = dirty_editor(&harness.guard, "/Edit");
    let cancelled = Rc::new(Cell::new(0));
    let _alert = {
        let cancelled = cancelled.clone();
        harness
            .guard
            .on_navigation_cancelled(move |_| cancelled.set(cancelled.get() + 1))
    };

    // The host intercepted the click before moving the transport.
    let outcome = cx
        .update(|cx| {
            harness.controller.handle_location_changed(
                &LocationChanged {
                    location: "/Other".to_string(),
                    is_navigation_intercepted: true,
                },
                cx,
            )
        })
        .unwrap();

    assert_eq!(
        outcome,
        NavigationOutcome::CancelledInPlace {
            attempted: "/Other".to_string(),
        }
    );
    assert_eq!(cancelled.get(), 1);
    assert_eq!(harness.render_count(), 1);
    assert!(!harness.controller.replay_pending());
    assert_eq!(harness.transport.uri(), "/Edit");
}

#[gpui::test]
fn test_saving_lifts_the_veto(cx: &mut TestAppContext) {
    let harness = start_harness("/Edit", cx);
    let editor = dirty_editor(&harness.guard, "/Edit");

    cx.update(|cx| harness.transport.navigate_to("/Other", false, cx));
    advance(cx, 50);
    assert_eq!(harness.transport.uri(), "/Edit");

    editor.mark_clean();
    cx.update(|cx| harness.transport.navigate_to("/Other", false, cx));

    assert_eq!(harness.last_rendered(), Some(Rendered::Found("Other".into())));
    assert!(!harness.guard.has_active_view());
    assert_eq!(harness.guard.navigation_cancelled_url(), None);
}

#[gpui::test]
fn test_back_button_is_vetoed_too(cx: &mut TestAppContext) {
    let harness = start_harness("/", cx);
    cx.update(|cx| harness.transport.navigate_to("/Edit", false, cx));
    let _editor = dirty_editor(&harness.guard, "/Edit");

    assert!(cx.update(|cx| harness.transport.back(cx)));
    assert_eq!(harness.controller.phase(), ControllerPhase::ReNavigating);

    advance(cx, 50);
    assert_eq!(harness.transport.uri(), "/Edit");
}

#[gpui::test]
fn test_initial_render_skips_guard(cx: &mut TestAppContext) {
    let harness = build_harness("/Other");
    let _editor = dirty_editor(&harness.guard, "/Edit");

    let outcome = cx.update(|cx| harness.controller.start(cx)).unwrap();

    assert!(outcome.is_rendered());
    assert!(!harness.controller.replay_pending());
    assert_eq!(harness.last_rendered(), Some(Rendered::Found("Other".into())));
}

// ============================================================================
// Lifecycle and configuration
// ============================================================================

#[gpui::test]
fn test_location_change_before_start_is_rejected(cx: &mut TestAppContext) {
    let harness = build_harness("/");

    let result = cx.update(|cx| {
        harness.controller.handle_location_changed(
            &LocationChanged {
                location: "/A".to_string(),
                is_navigation_intercepted: false,
            },
            cx,
        )
    });

    assert_eq!(
        result,
        Err(ConfigurationError::NotInitialized {
            location: "/A".to_string(),
        })
    );
    assert_eq!(harness.render_count(), 0);
}

#[test]
fn test_missing_templates_fail_fast() {
    let result = RouterController::builder(NavigationGuard::new(), MemoryTransport::new("/"))
        .resolver(test_resolver())
        .found(|_, _| {})
        .build();

    assert_eq!(
        result.err(),
        Some(ConfigurationError::MissingNotFoundTemplate)
    );
}

/// Transport that counts how often interception is enabled.
#[derive(Clone)]
struct CountingTransport {
    inner: MemoryTransport,
    enabled: Rc<Cell<usize>>,
}

impl NavigationTransport for CountingTransport {
    fn base_uri(&self) -> String {
        self.inner.base_uri()
    }

    fn uri(&self) -> String {
        self.inner.uri()
    }

    fn navigate_to(&self, url: &str, force_load: bool, cx: &mut App) {
        self.inner.navigate_to(url, force_load, cx);
    }

    fn subscribe(&self, listener: Box<dyn Fn(&LocationChanged, &mut App)>) -> Subscription {
        self.inner.subscribe(listener)
    }

    fn enable_navigation_interception(&self, cx: &mut App) {
        self.enabled.set(self.enabled.get() + 1);
        self.inner.enable_navigation_interception(cx);
    }
}

#[gpui::test]
fn test_interception_enabled_once_after_first_render(cx: &mut TestAppContext) {
    let transport = CountingTransport {
        inner: MemoryTransport::new("/nowhere"),
        enabled: Rc::new(Cell::new(0)),
    };
    let controller = RouterController::builder(NavigationGuard::new(), transport.clone())
        .resolver(test_resolver())
        .found(|_, _| {})
        .not_found(|_, _| {})
        .build()
        .unwrap();
    assert!(!transport.inner.is_interception_enabled());

    let outcome = cx.update(|cx| controller.start(cx)).unwrap();
    assert!(outcome.is_not_found());
    assert_eq!(transport.enabled.get(), 1);

    cx.update(|cx| {
        transport.navigate_to("/A", false, cx);
        transport.navigate_to("/B", false, cx);
        transport.inner.click_link("/users/1", cx);
    });
    assert_eq!(transport.enabled.get(), 1);
    assert!(transport.inner.is_interception_enabled());
}

#[gpui::test]
fn test_controller_on_base_uri(cx: &mut TestAppContext) {
    let transport = MemoryTransport::with_base("https://app.test/", "https://app.test/A");
    let guard = NavigationGuard::new();
    let controller = RouterController::builder(guard.clone(), transport.clone())
        .resolver(test_resolver())
        .found(|_, _| {})
        .not_found(|_, _| {})
        .build()
        .unwrap();
    cx.update(|cx| controller.start(cx)).unwrap();
    assert_eq!(guard.last_route_url().as_deref(), Some("/A"));

    let _editor = dirty_editor(&guard, "/A");
    cx.update(|cx| transport.navigate_to("/B", false, cx));
    advance(cx, 50);

    assert_eq!(transport.uri(), "https://app.test/A");
    assert_eq!(transport.navigation_count("https://app.test/A"), 1);
}
