//! Unsaved Editor Demo
//!
//! Walks a record editor through a refused navigation, a replay back to the
//! editor, and a save that lets the user leave. Run with
//! `RUST_LOG=navguard=debug` to watch the guard and controller decide.

use gpui::{App, Application};
use gpui_navguard::{
    resolver_fn, MemoryTransport, NavigationGuard, NavigationTransport, RouteData,
    RouterController, TrackedView,
};
use std::rc::Rc;
use std::time::Duration;

fn main() {
    env_logger::init();

    Application::new().run(|cx: &mut App| {
        let guard = NavigationGuard::new().with_exit_warning(|show: bool, _cx: &mut App| {
            println!("[window] confirm-before-close: {}", if show { "on" } else { "off" });
        });
        let transport = MemoryTransport::new("/");

        let controller = RouterController::builder(guard.clone(), transport.clone())
            .resolver(resolver_fn(|path| match path {
                "/" => Some(RouteData::new("Index")),
                "/Record/Editor" => Some(RouteData::new("RecordEditor")),
                _ => None,
            }))
            .found(|route, _cx| println!("[render] {}", route.handler))
            .not_found(|path, _cx| println!("[render] nothing at {}", path))
            .build();

        let controller = match controller {
            Ok(controller) => controller,
            Err(err) => {
                eprintln!("router misconfigured: {}", err);
                cx.quit();
                return;
            }
        };
        if let Err(err) = controller.start(cx) {
            eprintln!("router failed to start: {}", err);
            cx.quit();
            return;
        }

        // Open the editor and start typing.
        transport.navigate_to("/Record/Editor?id=1", false, cx);
        let editor = Rc::new(TrackedView::new("/Record/Editor?id=1"));
        guard.set_active_view(&editor);
        guard
            .on_navigation_cancelled({
                let editor = editor.clone();
                move |_cx| {
                    editor.note_exit_attempt();
                    println!("[alert] you have unsaved changes");
                }
            })
            .detach();
        editor.mark_dirty();
        guard.set_exit_warning(true, cx);

        // Try to leave; the transport moves, the guard sends it back.
        transport.navigate_to("/", false, cx);
        println!("[demo] phase after leaving: {:?}", controller.phase());

        cx.spawn(async move |cx| {
            cx.background_executor()
                .timer(Duration::from_millis(100))
                .await;

            let result = cx.update(|cx| {
                println!("[demo] back at {}", transport.uri());

                editor.mark_clean();
                guard.set_exit_warning(false, cx);
                transport.navigate_to("/", false, cx);
                println!("[demo] phase after saving: {:?}", controller.phase());

                cx.quit();
            });
            if let Err(err) = result {
                eprintln!("demo interrupted: {}", err);
            }
        })
        .detach();
    });
}
